// cat-manager-web/src/pages.rs
// ============================================================================
// Module: HTML Pages
// Description: askama templates for the kitten pages and error pages.
// Purpose: Render view-models into the HTML contract.
// Dependencies: askama, cat-manager-core
// ============================================================================

//! ## Overview
//! Templates live under `templates/` and are compiled into the crate. The
//! list page carries the stable markers `.t-kitten` and `.t-add-kitten`.
//! Values are HTML-escaped by askama.

// ============================================================================
// SECTION: Imports
// ============================================================================

use askama::Template;
use cat_manager_core::KittenFormView;
use cat_manager_core::KittenListView;

// ============================================================================
// SECTION: Templates
// ============================================================================

/// Kitten list template.
#[derive(Template)]
#[template(path = "kittens.html")]
struct KittenListPage<'a> {
    /// View-model to render.
    view: &'a KittenListView,
}

/// Add-kitten form template.
#[derive(Template)]
#[template(path = "kitten_form.html")]
struct KittenFormPage<'a> {
    /// View-model to render.
    view: &'a KittenFormView,
}

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
struct ErrorPage<'a> {
    /// Status code.
    status: u16,
    /// Canonical reason phrase.
    reason: &'a str,
    /// Public message.
    message: &'a str,
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders the kitten list page.
///
/// # Errors
///
/// Returns [`askama::Error`] when rendering fails.
pub fn render_kitten_list(view: &KittenListView) -> Result<String, askama::Error> {
    KittenListPage {
        view,
    }
    .render()
}

/// Renders the add-kitten form page.
///
/// # Errors
///
/// Returns [`askama::Error`] when rendering fails.
pub fn render_kitten_form(view: &KittenFormView) -> Result<String, askama::Error> {
    KittenFormPage {
        view,
    }
    .render()
}

/// Renders an error page.
///
/// # Errors
///
/// Returns [`askama::Error`] when rendering fails.
pub fn render_error(status: u16, reason: &str, message: &str) -> Result<String, askama::Error> {
    ErrorPage {
        status,
        reason,
        message,
    }
    .render()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
