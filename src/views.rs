//! Plain-text rendering of catalog records, the profile and error lists.

#[cfg(test)]
#[path = "views_test.rs"]
mod views_test;

use std::fmt::Write;

use crate::net::types::{Category, Color, Product, User, short_id};

/// Avatar text: the first letter of the name, or `N/A` before the profile loads.
#[must_use]
pub fn avatar(user: Option<&User>) -> String {
    user.and_then(|u| u.name.chars().next()).map_or_else(|| "N/A".to_owned(), |c| c.to_string())
}

#[must_use]
pub fn render_user(user: Option<&User>) -> String {
    match user {
        Some(u) => {
            let role = if u.is_admin { "admin" } else { "member" };
            format!("[{}] {} <{}> ({role})", avatar(Some(u)), u.name, u.email)
        }
        None => format!("[{}] profile not loaded", avatar(None)),
    }
}

#[must_use]
pub fn render_colors(colors: &[Color]) -> String {
    colors.iter().map(|c| format!("{}({})", c.name, c.hex_code)).collect::<Vec<_>>().join(" ")
}

/// Product table: short id, name, price, colors.
#[must_use]
pub fn render_products(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products.".to_owned();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:<10} {:<24} {:>10}  COLORS", "ID", "NAME", "PRICE");
    for p in products {
        let price = format!("${:.2}", p.price);
        let _ = writeln!(out, "{:<10} {:<24} {price:>10}  {}", short_id(&p.id), p.name, render_colors(&p.colors));
    }
    out
}

#[must_use]
pub fn render_product(product: &Product) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", product.name);
    let _ = writeln!(out, "  id:          {}", product.id);
    let _ = writeln!(out, "  price:       ${:.2}", product.price);
    if let Some(description) = &product.description {
        let _ = writeln!(out, "  description: {description}");
    }
    if let Some(category_id) = &product.category_id {
        let _ = writeln!(out, "  category:    {category_id}");
    }
    if !product.colors.is_empty() {
        let _ = writeln!(out, "  colors:      {}", render_colors(&product.colors));
    }
    out
}

#[must_use]
pub fn render_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories.".to_owned();
    }
    let mut out = String::new();
    for c in categories {
        let _ = writeln!(out, "{}  {}", c.id, c.name);
    }
    out
}

/// Category detail. The edit action is listed only when `show_admin` is set.
#[must_use]
pub fn render_category(category: &Category, show_admin: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", category.name);
    let actions = if show_admin { "edit, delete" } else { "delete" };
    let _ = writeln!(out, "  actions: {actions}");
    if !category.products.is_empty() {
        out.push('\n');
        out.push_str(&render_products(&category.products));
    }
    out
}

/// One error per line, as shown under a form.
#[must_use]
pub fn render_errors(messages: &[String]) -> String {
    messages.iter().map(|m| format!("error: {m}")).collect::<Vec<_>>().join("\n")
}
