//! Pantry page

use chrono::{DateTime, Utc};
use lwmt_common::models::{LocationFilter, PantryItem, StorageLocation};
use lwmt_common::time::{to_date_input, to_display_date};

use super::{escape, message};
use crate::pantry::actions::MSG_SIGN_IN_TO_VIEW;

/// What the list region shows
#[derive(Debug, Clone, PartialEq)]
pub enum PantryListView {
    SignedOut,
    /// Signed in, first snapshot not yet received
    Loading,
    Items {
        items: Vec<PantryItem>,
        now: DateTime<Utc>,
    },
}

pub fn render_pantry_item(item: &PantryItem, now: DateTime<Utc>) -> String {
    let status = item.freshness(now).css_class();
    let id = escape(&item.id);
    format!(
        r#"<div class="pantry-item {status} bg-{status}" data-id="{id}">
    <form class="eaten-action" method="post" action="/kitchen/items/{id}/consume">
        <button class="eat-btn" type="submit"><i class="fas fa-utensils"></i></button>
        <span>Finished!</span>
    </form>
    <div class="item-info">
        <span class="item-name">{name} ({quantity})</span>
        <span class="item-details">
            Location: {place}
            <span class="item-details-seperator">|</span>
            Expires: {expires}
        </span>
    </div>
    <div class="item-actions">
        <a class="edit-btn" href="/kitchen/items/{id}/edit"><i class="fas fa-edit"></i></a>
        <form method="post" action="/kitchen/items/{id}/delete">
            <button class="remove-btn" type="submit"><i class="fas fa-trash-alt"></i></button>
        </form>
    </div>
</div>"#,
        name = escape(&item.name),
        quantity = item.quantity,
        place = item.place,
        expires = to_display_date(item.expiry_date),
    )
}

pub fn render_pantry_list(view: &PantryListView) -> String {
    match view {
        PantryListView::SignedOut => message(MSG_SIGN_IN_TO_VIEW, false),
        PantryListView::Loading => {
            r#"<p id="pantry-loading" class="text-center text-gray-500">Loading your pantry...</p>"#
                .to_string()
        }
        PantryListView::Items { items, .. } if items.is_empty() => message("No items found.", false),
        PantryListView::Items { items, now } => items
            .iter()
            .map(|item| render_pantry_item(item, *now))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

pub fn render_tabs(active: LocationFilter) -> String {
    let filters = std::iter::once(LocationFilter::All)
        .chain(StorageLocation::ALL.iter().map(|l| LocationFilter::Only(*l)));

    let buttons: String = filters
        .map(|filter| {
            let class = if filter == active {
                "tab-button active"
            } else {
                "tab-button"
            };
            format!(
                r#"<a class="{class}" data-place="{place}" href="/kitchen?place={place}">{place}</a>"#,
                place = filter.as_str()
            )
        })
        .collect();

    format!(r#"<div id="pantry-tabs" class="pantry-tabs">{}</div>"#, buttons)
}

fn place_options(selected: Option<StorageLocation>) -> String {
    StorageLocation::ALL
        .iter()
        .map(|location| {
            let attr = if Some(*location) == selected { " selected" } else { "" };
            format!(r#"<option value="{0}"{1}>{0}</option>"#, location, attr)
        })
        .collect()
}

pub fn render_add_form() -> String {
    format!(
        r#"<form id="pantry-form" class="pantry-form" method="post" action="/kitchen/items">
    <input type="text" id="item-name" name="name" placeholder="Item name" required>
    <input type="number" id="item-quantity" name="quantity" min="0" placeholder="Qty" required>
    <input type="date" id="item-expiry" name="expiry_date" required>
    <select id="item-place" name="place" required>
        <option value="">Location</option>
        {}
    </select>
    <button type="submit" class="add-item-button">Add Item</button>
</form>"#,
        place_options(None)
    )
}

/// Edit form prefilled from a point read
pub fn render_edit_form(item: &PantryItem) -> String {
    format!(
        r#"<div id="edit-item-modal" class="modal">
    <div class="modal-content">
        <a id="close-edit-modal" class="close-modal" href="/kitchen">&times;</a>
        <h2>Edit Item</h2>
        <form id="edit-form" method="post" action="/kitchen/items/{id}">
            <input type="text" id="edit-item-name" name="name" value="{name}" required>
            <input type="number" id="edit-item-quantity" name="quantity" min="0" value="{quantity}" required>
            <input type="date" id="edit-item-expiry" name="expiry_date" value="{expiry}" required>
            <select id="edit-item-place" name="place" required>{options}</select>
            <button type="submit">Save Changes</button>
        </form>
    </div>
</div>"#,
        id = escape(&item.id),
        name = escape(&item.name),
        quantity = item.quantity,
        expiry = to_date_input(item.expiry_date),
        options = place_options(Some(item.place)),
    )
}

/// Page body; `edit` renders the edit modal over the list
pub fn render_kitchen(filter: LocationFilter, list: &PantryListView, edit: Option<&PantryItem>) -> String {
    format!(
        r#"<section class="kitchen">
    <h1>My Kitchen</h1>
    {form}
    {tabs}
    <div id="pantry-list" class="pantry-list" data-fragment="/kitchen/list?place={place}" data-live="PantryChanged">
    {list}
    </div>
</section>
{edit}"#,
        form = render_add_form(),
        tabs = render_tabs(filter),
        place = filter.as_str(),
        list = render_pantry_list(list),
        edit = edit.map(render_edit_form).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(id: &str, name: &str, days: i64, place: StorageLocation, now: DateTime<Utc>) -> PantryItem {
        PantryItem {
            id: id.to_string(),
            name: name.to_string(),
            quantity: 2,
            place,
            expiry_date: now + Duration::days(days),
            added_at: now,
        }
    }

    #[test]
    fn test_item_shows_freshness_band() {
        let now = Utc::now();
        let bad = render_pantry_item(&item("1", "Milk", 1, StorageLocation::Fridge, now), now);
        let warn = render_pantry_item(&item("2", "Eggs", 5, StorageLocation::Fridge, now), now);
        let good = render_pantry_item(&item("3", "Rice", 30, StorageLocation::Pantry, now), now);

        assert!(bad.contains("pantry-item status-bad bg-status-bad"));
        assert!(warn.contains("status-warning"));
        assert!(good.contains("status-good"));
        assert!(good.contains("Rice (2)"));
        assert!(good.contains("Location: Pantry"));
    }

    #[test]
    fn test_list_states() {
        assert!(render_pantry_list(&PantryListView::SignedOut).contains(MSG_SIGN_IN_TO_VIEW));
        assert!(render_pantry_list(&PantryListView::Loading).contains("pantry-loading"));
        let empty = PantryListView::Items {
            items: vec![],
            now: Utc::now(),
        };
        assert!(render_pantry_list(&empty).contains("No items found."));
    }

    #[test]
    fn test_item_name_is_escaped() {
        let now = Utc::now();
        let html = render_pantry_item(&item("1", "<b>Jam</b>", 9, StorageLocation::Pantry, now), now);
        assert!(html.contains("&lt;b&gt;Jam&lt;/b&gt;"));
    }

    #[test]
    fn test_tabs_mark_active() {
        let html = render_tabs(LocationFilter::Only(StorageLocation::Freezer));
        assert!(html.contains(r#"<a class="tab-button active" data-place="Freezer""#));
        assert!(html.contains(r#"<a class="tab-button" data-place="All""#));
    }

    #[test]
    fn test_edit_form_prefilled() {
        let now = Utc::now();
        let mut it = item("abc", "Peas", 3, StorageLocation::Freezer, now);
        it.expiry_date = lwmt_common::time::parse_date_input("2030-05-06").unwrap();
        let html = render_edit_form(&it);
        assert!(html.contains(r#"value="2030-05-06""#));
        assert!(html.contains(r#"<option value="Freezer" selected>Freezer</option>"#));
        assert!(html.contains(r#"action="/kitchen/items/abc""#));
    }
}
