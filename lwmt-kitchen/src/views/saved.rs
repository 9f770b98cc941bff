//! Saved recipes page

use lwmt_common::models::SavedRecipe;

use super::{escape, message, strip_tags};

pub const MSG_NONE_SAVED: &str = "You haven't saved any recipes yet!";
pub const MSG_SIGN_IN_TO_VIEW_SAVED: &str = "Please sign in to view your saved recipes.";
pub const MSG_DETAILS_NOT_FOUND: &str = "Recipe details not found.";

#[derive(Debug, Clone, PartialEq)]
pub enum SavedListView {
    SignedOut,
    Recipes(Vec<SavedRecipe>),
    /// Listing failed; message shown inline
    Failed(String),
}

/// Zero means the source recipe did not say
fn known(value: u32) -> String {
    if value == 0 {
        "?".to_string()
    } else {
        value.to_string()
    }
}

fn unsave_form(recipe_id: i64, class: &str) -> String {
    format!(
        r#"<form method="post" action="/saved/{id}/unsave">
    <button type="submit" class="{class}" data-recipe-id="{id}"><i class="fa-solid fa-bookmark"></i> Unsave</button>
</form>"#,
        id = recipe_id,
    )
}

pub fn render_saved_card(recipe: &SavedRecipe) -> String {
    format!(
        r#"<div class="feature-card recipe-card">
    <img src="{image}" alt="{title}" class="recipe-card-image">
    <div class="recipe-card-content">
        <h3 class="recipe-title">{title}</h3>
        <div class="recipe-meta">
            <span><i class="fa-regular fa-clock"></i> {minutes} mins</span>
            <span><i class="fa-regular fa-user"></i> {servings} servings</span>
        </div>
    </div>
    <div class="recipe-card-actions">
        <a class="view-recipe-button" href="/saved/{id}">View Recipe</a>
        {unsave}
    </div>
</div>"#,
        image = escape(&recipe.image),
        title = escape(&recipe.title),
        minutes = known(recipe.ready_in_minutes),
        servings = known(recipe.servings),
        id = recipe.id,
        unsave = unsave_form(recipe.id, "unsave-button"),
    )
}

pub fn render_saved_list(view: &SavedListView) -> String {
    let body = match view {
        SavedListView::SignedOut => message(MSG_SIGN_IN_TO_VIEW_SAVED, false),
        SavedListView::Failed(text) => message(text, true),
        SavedListView::Recipes(recipes) if recipes.is_empty() => message(MSG_NONE_SAVED, false),
        SavedListView::Recipes(recipes) => recipes
            .iter()
            .map(render_saved_card)
            .collect::<Vec<_>>()
            .join("\n"),
    };

    format!(
        r#"<section class="saved-recipes">
    <h1>Saved Recipes</h1>
    <div id="saved-recipes-container" class="recipe-card-grid">
{}
    </div>
</section>"#,
        body
    )
}

/// Stored detail, or the not-found message when the document is gone
pub fn render_saved_detail(recipe: Option<&SavedRecipe>) -> String {
    let Some(recipe) = recipe else {
        return format!(
            r#"<div id="recipe-modal" class="recipe-modal">
    <div class="recipe-modal-content">
        <a class="modal-close-btn" href="/saved">&times;</a>
        {}
    </div>
</div>"#,
            message(MSG_DETAILS_NOT_FOUND, true)
        );
    };

    let instructions = Some(strip_tags(&recipe.instructions))
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| "No instructions provided.".to_string());
    let ingredients: String = recipe
        .extended_ingredients
        .iter()
        .map(|i| format!("<li>{}</li>", escape(&i.original)))
        .collect();

    format!(
        r#"<div id="recipe-modal" class="recipe-modal">
    <div class="recipe-modal-content">
        <a class="modal-close-btn" href="/saved">&times;</a>
        <h1 class="recipe-title">{title}</h1>
        <div class="recipe-modal-image-container">
            <img src="{image}" alt="{title}" class="recipe-image">
            {unsave}
        </div>
        <div class="recipe-meta">
            <span class="flex items-center"><i class="fa-regular fa-clock mr-2"></i> {minutes} mins</span>
            <span class="flex items-center"><i class="fa-regular fa-user mr-2"></i> {servings} servings</span>
            <span class="flex items-center"><i class="fa-regular fa-heart mr-2"></i> {likes} likes</span>
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
        title = escape(&recipe.title),
        image = escape(&recipe.image),
        unsave = unsave_form(recipe.id, "save-recipe-button recipe-modal-save-btn"),
        minutes = known(recipe.ready_in_minutes),
        servings = known(recipe.servings),
        likes = recipe.likes,
        instructions = escape(&instructions),
    )
}
