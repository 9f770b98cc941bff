//! Donation map page: nearby food banks and shelters

use lwmt_common::models::{PlaceDetails, PlaceSummary};

use super::{escape, message};
use crate::places::{NearbyResults, MSG_LOCATION_FALLBACK};

/// Page shell; the browser fills `#nearby-results` once it has a position
pub fn render_donate() -> String {
    r#"<section class="donate">
    <h1>Donate Food Nearby</h1>
    <p class="subtitle">Food banks and shelters around you. Select a place for its details.</p>
    <div id="nearby-results" class="nearby-results" data-nearby="/donate/nearby">
        <p class="text-center text-gray-500">Finding your location...</p>
    </div>
    <div id="place-details" class="place-details"></div>
</section>"#
        .to_string()
}

fn maps_link(place: &PlaceSummary) -> String {
    match place.location {
        Some(at) => format!(
            r#"<a class="map-link" target="_blank" rel="noopener" href="https://www.google.com/maps/search/?api=1&amp;query={},{}&amp;query_place_id={}"><i class="fa-solid fa-location-dot"></i> Map</a>"#,
            at.lat,
            at.lng,
            escape(&place.place_id)
        ),
        None => String::new(),
    }
}

fn render_place(place: &PlaceSummary) -> String {
    format!(
        r#"<li class="place-entry" data-place-id="{id}">
    <button type="button" class="place-name" data-details="/donate/places/{id}">{name}</button>
    <span class="place-vicinity">{vicinity}</span>
    {map}
</li>"#,
        id = escape(&place.place_id),
        name = escape(&place.name),
        vicinity = escape(&place.vicinity),
        map = maps_link(place),
    )
}

/// Fragment listing every category
pub fn render_nearby(results: &NearbyResults) -> String {
    let fallback = if results.used_fallback {
        format!(
            r#"<div class="location-notice" data-alert="{0}">{1}</div>"#,
            escape(MSG_LOCATION_FALLBACK),
            message(MSG_LOCATION_FALLBACK, false)
        )
    } else {
        String::new()
    };

    let sections: String = results
        .categories
        .iter()
        .map(|group| {
            let list = if group.places.is_empty() {
                message("Nothing found nearby.", false)
            } else {
                let entries: String = group.places.iter().map(render_place).collect();
                format!(r#"<ul class="place-list">{}</ul>"#, entries)
            };
            format!(
                r#"<div class="place-category" data-keyword="{}">
    <h2>{}</h2>
    {}
</div>"#,
                escape(group.category.keyword()),
                group.category.label(),
                list
            )
        })
        .collect();

    format!(
        r#"{}<p class="map-center" data-lat="{}" data-lng="{}"></p>
{}"#,
        fallback, results.center.lat, results.center.lng, sections
    )
}

/// Details-on-demand fragment
pub fn render_place_details(details: &PlaceDetails) -> String {
    let mut lines = vec![format!("<h3>{}</h3>", escape(&details.name))];
    if let Some(address) = &details.formatted_address {
        lines.push(format!("<p>{}</p>", escape(address)));
    }
    if let Some(phone) = &details.formatted_phone_number {
        lines.push(format!(
            r#"<p><a href="tel:{0}">{0}</a></p>"#,
            escape(phone)
        ));
    }
    if let Some(website) = &details.website {
        lines.push(format!(
            r#"<p><a href="{}" target="_blank" rel="noopener">Visit Website</a></p>"#,
            escape(website)
        ));
    }
    format!(r#"<div class="info-window">{}</div>"#, lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::CategoryResults;
    use lwmt_common::models::{LatLng, PlaceCategory};

    fn results(fallback: bool) -> NearbyResults {
        NearbyResults {
            center: LatLng {
                lat: 39.8283,
                lng: -98.5795,
            },
            used_fallback: fallback,
            categories: vec![
                CategoryResults {
                    category: PlaceCategory::FoodBank,
                    places: vec![PlaceSummary {
                        place_id: "p1".to_string(),
                        name: "Harvest & Co".to_string(),
                        vicinity: "1 Main St".to_string(),
                        location: Some(LatLng { lat: 1.5, lng: 2.5 }),
                    }],
                },
                CategoryResults {
                    category: PlaceCategory::Shelter,
                    places: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_nearby_lists_categories() {
        let html = render_nearby(&results(false));
        assert!(html.contains("Harvest &amp; Co"));
        assert!(html.contains(r#"data-details="/donate/places/p1""#));
        assert!(html.contains("Shelters"));
        assert!(html.contains("Nothing found nearby."));
        assert!(!html.contains(MSG_LOCATION_FALLBACK));
    }

    #[test]
    fn test_fallback_notice() {
        let html = render_nearby(&results(true));
        assert!(html.contains(MSG_LOCATION_FALLBACK));
        assert!(html.contains(r#"data-lat="39.8283""#));
    }

    #[test]
    fn test_details_fields() {
        let html = render_place_details(&PlaceDetails {
            name: "Pantry".to_string(),
            formatted_address: Some("2 Elm".to_string()),
            formatted_phone_number: Some("555-0100".to_string()),
            website: Some("https://pantry.example".to_string()),
        });
        assert!(html.contains(r#"href="tel:555-0100""#));
        assert!(html.contains("Visit Website"));

        let bare = render_place_details(&PlaceDetails {
            name: "Bare".to_string(),
            ..Default::default()
        });
        assert!(!bare.contains("Visit Website"));
    }
}
