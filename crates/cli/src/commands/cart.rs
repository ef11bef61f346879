//! Cart commands.
//!
//! Line operations that know the live product (inc, set) fetch it first so
//! the new quantity is capped at stock.

use shopfront_core::{EnrichedLineItem, ProductId, StockStatus, format_amount};
use shopfront_storefront::cart::{Adjustment, item_count};
use shopfront_storefront::error::AppError;
use shopfront_storefront::popup::add_to_cart_popup;
use shopfront_storefront::state::AppState;

use super::popup;

/// Show the reconciled cart and its total.
#[allow(clippy::print_stdout)]
pub async fn show(state: &AppState) -> Result<(), AppError> {
    let cart = state.cart_store().load();
    let view = state.cart_view();
    view.refresh(&cart).await;
    let items = view.items();

    if items.is_empty() {
        println!("Your cart is empty");
        return Ok(());
    }

    for item in &items {
        println!(
            "{:<32} {:>4} x {:>10} = {:>10}{}",
            item.product.name,
            item.quantity,
            format_amount(item.product.price.amount()),
            format_amount(item.line_total()),
            stock_note(item),
        );
    }

    let dropped = cart.len().saturating_sub(items.len());
    if dropped > 0 {
        println!("({dropped} unavailable item(s) not shown)");
    }
    println!("{} item(s), total {}", item_count(&items), format_amount(view.total()));

    if !state.viewer().can_checkout(&cart) {
        println!("Sign in to check out");
    }
    Ok(())
}

fn stock_note(item: &EnrichedLineItem) -> String {
    match item.product.stock_status() {
        StockStatus::OutOfStock => "  (out of stock)".to_string(),
        _ if item.exceeds_stock() => format!("  (only {} left)", item.product.stock),
        StockStatus::LowStock(n) => format!("  ({n} left)"),
        StockStatus::InStock(_) => String::new(),
    }
}

/// Add units of a product and show the result popup.
pub async fn add(state: &AppState, id: &str, quantity: u32) -> Result<(), AppError> {
    let product = state.api().get_product(&ProductId::new(id)).await?;
    let outcome = state.quantities().add(&product, quantity);
    popup::print(&add_to_cart_popup(&outcome));
    outcome?;
    Ok(())
}

/// Raise a line by one, up to stock.
pub async fn increment(state: &AppState, id: &str) -> Result<(), AppError> {
    let item = line(state, id).await?;
    let adjustment = state.quantities().increment_line(&item)?;
    report(id, adjustment);
    Ok(())
}

/// Lower a line by one, never below 1.
pub fn decrement(state: &AppState, id: &str) -> Result<(), AppError> {
    let adjustment = state.quantities().decrement(&ProductId::new(id))?;
    report(id, adjustment);
    Ok(())
}

/// Set a line's quantity. Zero removes the line only when confirmed.
pub async fn set(state: &AppState, id: &str, quantity: u32, confirmed: bool) -> Result<(), AppError> {
    let item = line(state, id).await?;
    let mut adjustment = state.quantities().set_line_quantity(&item, quantity)?;
    if adjustment == Adjustment::ConfirmRemoval && confirmed {
        adjustment = state.quantities().remove(item.product_id())?;
    }
    report(id, adjustment);
    Ok(())
}

/// Remove a line.
pub fn remove(state: &AppState, id: &str) -> Result<(), AppError> {
    let adjustment = state.quantities().remove(&ProductId::new(id))?;
    report(id, adjustment);
    Ok(())
}

/// The cart line for `id` joined with its live product.
async fn line(state: &AppState, id: &str) -> Result<EnrichedLineItem, AppError> {
    let id = ProductId::new(id);
    let quantity = state.cart_store().load().quantity_of(&id).unwrap_or(0);
    let product = state.api().get_product(&id).await?;
    Ok(EnrichedLineItem::new(product, quantity))
}

#[allow(clippy::print_stdout)]
fn report(id: &str, adjustment: Adjustment) {
    match adjustment {
        Adjustment::Updated { quantity } => println!("{id}: quantity {quantity}"),
        Adjustment::Unchanged { quantity } => println!("{id}: unchanged at {quantity}"),
        Adjustment::ConfirmRemoval => {
            println!("{id}: quantity 0 removes the item; pass --yes to confirm");
        }
        Adjustment::Removed => println!("{id}: removed"),
        Adjustment::NotInCart => println!("{id}: not in cart"),
    }
}
