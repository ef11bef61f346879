//! Product and category commands.

use shopfront_core::{ProductId, StockStatus};
use shopfront_storefront::admin::{NewProductForm, submit_new_product};
use shopfront_storefront::error::AppError;
use shopfront_storefront::state::AppState;

/// Show one product.
#[allow(clippy::print_stdout)]
pub async fn show(state: &AppState, id: &str) -> Result<(), AppError> {
    let product = state.api().get_product(&ProductId::new(id)).await?;

    println!("{} ({})", product.name, product.id);
    println!("  price:    {}", product.price);
    println!(
        "  stock:    {}",
        match product.stock_status() {
            StockStatus::OutOfStock => "out of stock".to_string(),
            StockStatus::LowStock(n) => format!("only {n} left"),
            StockStatus::InStock(n) => format!("{n} in stock"),
        }
    );
    if let Some(category) = &product.category {
        println!("  category: {}", category.id());
    }
    println!("  image:    {}", product.primary_image());
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
    Ok(())
}

/// Submit a new product as the configured identity.
///
/// The outcome is also stashed as a popup for `shopfront popup`.
#[allow(clippy::print_stdout)]
pub async fn create(state: &AppState, form: &NewProductForm) -> Result<(), AppError> {
    let product = submit_new_product(state.api(), &state.popups(), state.viewer(), form).await?;
    println!("Created {}", product.name);
    Ok(())
}

/// List categories.
#[allow(clippy::print_stdout)]
pub async fn categories(state: &AppState) -> Result<(), AppError> {
    let categories = state.api().list_categories().await?;
    for category in categories {
        println!("{:<26} {}", category.id, category.name);
    }
    Ok(())
}
