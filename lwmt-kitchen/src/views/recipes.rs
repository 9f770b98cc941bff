//! Recipe search page and recipe detail

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use lwmt_common::models::{IngredientRef, RecipeDetail, RecipeSummary};

use super::{capitalize, escape, message, strip_tags};
use crate::recipes::{QuickAdd, SearchOutcome, DEFAULT_QUICK_ADD};

/// Ingredients listed before "Show more"
pub const CARD_LIST_LIMIT: usize = 4;

fn bookmark(saved: bool) -> &'static str {
    if saved {
        "fa-solid"
    } else {
        "fa-regular"
    }
}

fn save_button(recipe_id: i64, saved: bool, extra_class: &str, return_to: &str) -> String {
    format!(
        r#"<form method="post" action="/recipes/{id}/save" class="save-recipe-form">
    <input type="hidden" name="return_to" value="{return_to}">
    <button class="save-recipe-button{extra}" data-recipe-id="{id}" type="submit"><i class="{icon} fa-bookmark"></i></button>
</form>"#,
        id = recipe_id,
        return_to = escape(return_to),
        extra = extra_class,
        icon = bookmark(saved),
    )
}

pub fn render_selected(ingredients: &[String]) -> String {
    ingredients
        .iter()
        .map(|ingredient| {
            format!(
                r#"<form method="post" action="/recipes/ingredients/remove" class="ingredient-pill" data-ingredient="{0}">
    {0} <input type="hidden" name="ingredient" value="{0}"><button type="submit" class="remove-ingredient"><i class="fa-solid fa-xmark"></i></button>
</form>"#,
                escape(ingredient)
            )
        })
        .collect()
}

fn quick_add_pill(name: &str, class: &str) -> String {
    format!(
        r#"<form method="post" action="/recipes/ingredients" class="quick-add-form">
    <input type="hidden" name="ingredient" value="{0}">
    <button type="submit" class="ingredient-pill quick-add-item {1}" data-ingredient="{0}">{0}</button>
</form>"#,
        escape(name),
        class
    )
}

pub fn render_quick_add(quick_add: &QuickAdd, now: DateTime<Utc>) -> String {
    let pills: String = match quick_add {
        QuickAdd::Pantry(items) => items
            .iter()
            .map(|item| {
                let class = format!("bg-{}", item.freshness(now).css_class());
                quick_add_pill(&item.name, &class)
            })
            .collect(),
        QuickAdd::Defaults => DEFAULT_QUICK_ADD
            .iter()
            .map(|name| quick_add_pill(name, ""))
            .collect(),
    };

    format!(
        r#"<div class="quick-add">
    <p class="quick-add-title">{}</p>
    <div class="quick-add-pills">{}</div>
</div>"#,
        quick_add.title(),
        pills
    )
}

fn ingredient_list(ingredients: &[IngredientRef], used: bool) -> String {
    let item = |i: &IngredientRef| format!("<li>{}</li>", escape(&capitalize(&i.name)));
    let visible: String = ingredients.iter().take(CARD_LIST_LIMIT).map(item).collect();
    let long = ingredients.len() > CARD_LIST_LIMIT;

    let (icon, verb, kind) = if used {
        ("check-circle ingredient-icon-check", "have", "used")
    } else {
        ("circle-question ingredient-icon-ques", "need", "missed")
    };

    let hidden = if long {
        let full: String = ingredients.iter().map(item).collect();
        format!(r#"<ul class="hidden-list hidden">{}</ul>"#, full)
    } else {
        String::new()
    };
    let show_more = if long {
        format!(
            r#"<button class="show-more-button" type="button" data-list-type="{}">Show more</button>"#,
            kind
        )
    } else {
        String::new()
    };

    format!(
        r#"<div class="ingredient-list">
    <p class="ingredient-list-title"><i class="fa-solid fa-{icon}"></i> You {verb} {count} ingredients:</p>
    <div class="ingredient-list-content">
        <ul class="visible-list">{visible}</ul>
        {hidden}
    </div>
    {show_more}
</div>"#,
        count = ingredients.len(),
    )
}

pub fn render_card(recipe: &RecipeSummary, saved: bool) -> String {
    format!(
        r#"<div class="feature-card recipe-card">
    <img src="{image}" alt="{title}" class="recipe-card-image">
    <div class="recipe-card-content">
        <h3 class="recipe-title">{title}</h3>
        <div class="recipe-meta">
            <span class="flex items-center gap-1"><i class="fa-regular fa-heart icon"></i> {likes} likes</span>
        </div>
        <div class="ingredient-lists-container">
            {used}
            {missed}
        </div>
    </div>
    <div class="recipe-card-actions">
        <a class="view-recipe-button" data-recipe-id="{id}" href="/recipes/{id}">View Recipe</a>
        {save}
    </div>
</div>"#,
        image = escape(&recipe.image),
        title = escape(&recipe.title),
        likes = recipe.likes,
        used = ingredient_list(&recipe.used_ingredients, true),
        missed = ingredient_list(&recipe.missed_ingredients, false),
        id = recipe.id,
        save = save_button(recipe.id, saved, "", "/recipes"),
    )
}

/// Card grid, or the inline message of the last search
pub fn render_cards(
    summaries: &[RecipeSummary],
    saved_ids: &HashSet<i64>,
    outcome: Option<SearchOutcome>,
) -> String {
    if let Some(text) = outcome.and_then(|o| o.message()) {
        let error = outcome.map(|o| o.is_error()).unwrap_or(false);
        return format!(
            r#"<div class="feature-card recipe-card p-4">{}</div>"#,
            message(text, error)
        );
    }

    summaries
        .iter()
        .map(|recipe| render_card(recipe, saved_ids.contains(&recipe.id)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_recipes(selected: &[String], quick_add: &str, cards: &str) -> String {
    format!(
        r#"<section class="recipe-search">
    <h1>Find a Recipe</h1>
    <form class="ingredient-form" method="post" action="/recipes/ingredients">
        <input type="text" class="ingredient-input" name="ingredient" placeholder="Add an ingredient">
        <button type="submit" class="add-button">Add</button>
    </form>
    <div id="selected-ingredients-container" class="selected-ingredients">{selected}</div>
    {quick_add}
    <form method="post" action="/recipes/search">
        <button type="submit" class="generate-button">Generate Recipes</button>
    </form>
</section>
<section id="card-list" class="recipe-card-grid">
{cards}
</section>"#,
        selected = render_selected(selected),
    )
}

/// Score shown out of 100, rounded
fn score(detail: &RecipeDetail) -> String {
    match detail.spoonacular_score {
        Some(score) => format!("{:.0}/100", score),
        None => "?/100".to_string(),
    }
}

fn or_unknown(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "?".to_string())
}

pub fn render_detail(detail: &RecipeDetail, saved: bool) -> String {
    let instructions = detail
        .instructions
        .as_deref()
        .map(strip_tags)
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| "No instructions provided.".to_string());
    let ingredients: String = detail
        .extended_ingredients
        .iter()
        .map(|i| format!("<li>{}</li>", escape(&i.original)))
        .collect();
    let return_to = format!("/recipes/{}", detail.id);

    format!(
        r#"<div id="recipe-modal" class="recipe-modal">
    <div class="recipe-modal-content">
        <a class="modal-close-btn" href="/recipes">&times;</a>
        <h1 class="recipe-title">{title}</h1>
        <div class="recipe-modal-image-container">
            <img src="{image}" alt="{title}" class="recipe-image">
            {save}
        </div>
        <div class="recipe-meta">
            <span class="flex items-center"><i class="fa-regular fa-clock mr-2"></i> {minutes} mins</span>
            <span class="flex items-center"><i class="fa-regular fa-user mr-2"></i> {servings} servings</span>
            <span class="flex items-center"><i class="fa-solid fa-star mr-2"></i> Spoonacular Score: {score}</span>
        </div>
        <div class="recipe-content-layout">
            <div>
                <h2 class="recipe-section-title">Ingredients</h2>
                <ul class="recipe-list">{ingredients}</ul>
            </div>
            <div>
                <h2 class="recipe-section-title">Instructions</h2>
                <p class="text-gray-700 whitespace-pre-wrap">{instructions}</p>
            </div>
        </div>
    </div>
</div>"#,
        title = escape(&detail.title),
        image = escape(&detail.image),
        save = save_button(detail.id, saved, " recipe-modal-save-btn", &return_to),
        minutes = or_unknown(detail.ready_in_minutes),
        servings = or_unknown(detail.servings),
        score = score(detail),
        instructions = escape(&instructions),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lwmt_common::models::{ExtendedIngredient, PantryItem, StorageLocation};

    fn refs(names: &[&str]) -> Vec<IngredientRef> {
        names
            .iter()
            .map(|n| IngredientRef {
                name: n.to_string(),
            })
            .collect()
    }

    fn summary(id: i64, used: &[&str]) -> RecipeSummary {
        RecipeSummary {
            id,
            title: "Garlic Pasta".to_string(),
            image: "https://img.example/1.jpg".to_string(),
            used_ingredients: refs(used),
            missed_ingredients: refs(&["pasta"]),
            likes: 42,
        }
    }

    #[test]
    fn test_card_limits_visible_ingredients() {
        let html = render_card(&summary(1, &["garlic", "oil", "salt", "pepper", "basil"]), false);
        let visible = html.split("hidden-list").next().unwrap();
        assert_eq!(visible.matches("<li>").count(), 4);
        assert!(html.contains("Show more"));
        assert!(html.contains("<li>Garlic</li>"));
        assert!(html.contains("You have 5 ingredients:"));
        assert!(html.contains("fa-regular fa-bookmark"));
    }

    #[test]
    fn test_short_list_has_no_show_more() {
        let html = render_card(&summary(1, &["garlic"]), true);
        assert!(!html.contains("Show more"));
        assert!(html.contains("fa-solid fa-bookmark"));
    }

    #[test]
    fn test_cards_replaced_by_outcome_message() {
        let ids = HashSet::new();
        let html = render_cards(&[summary(1, &[])], &ids, Some(SearchOutcome::NoResults));
        assert!(html.contains("No recipes found with those ingredients. Try adding more!"));
        assert!(!html.contains("recipe-card-image"));

        let html = render_cards(&[summary(1, &[])], &ids, Some(SearchOutcome::Failed));
        assert!(html.contains("text-red-500"));

        let html = render_cards(&[summary(1, &[])], &ids, Some(SearchOutcome::Found(1)));
        assert!(html.contains("recipe-card-image"));
    }

    #[test]
    fn test_quick_add_titles_and_colours() {
        let now = Utc::now();
        let defaults = render_quick_add(&QuickAdd::Defaults, now);
        assert!(defaults.contains("Quickly add common ingredients"));
        assert_eq!(defaults.matches("quick-add-item").count(), 13);

        let pantry = QuickAdd::Pantry(vec![PantryItem {
            id: "1".to_string(),
            name: "Spinach".to_string(),
            quantity: 1,
            place: StorageLocation::Fridge,
            expiry_date: now + chrono::Duration::days(1),
            added_at: now,
        }]);
        let html = render_quick_add(&pantry, now);
        assert!(html.contains("Quickly add items from your kitchen"));
        assert!(html.contains("bg-status-bad"));
    }

    #[test]
    fn test_detail_strips_instruction_markup() {
        let detail = RecipeDetail {
            id: 9,
            title: "Soup".to_string(),
            image: String::new(),
            instructions: Some("<ol><li>Chop</li><li>Simmer</li></ol>".to_string()),
            servings: Some(4),
            ready_in_minutes: Some(45),
            spoonacular_score: Some(87.6),
            aggregate_likes: None,
            extended_ingredients: vec![ExtendedIngredient {
                original: "1 onion".to_string(),
            }],
        };
        let html = render_detail(&detail, false);
        assert!(html.contains("ChopSimmer"));
        assert!(!html.contains("<ol>"));
        assert!(html.contains("Spoonacular Score: 88/100"));
        assert!(html.contains("45 mins"));
        assert!(html.contains("<li>1 onion</li>"));
    }
}
