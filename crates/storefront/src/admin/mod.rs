//! Admin-only catalog operations.
//!
//! Every operation here checks the viewer's `admin` capability first and acts
//! with the viewer's access token.

mod product_form;

pub use product_form::{
    FieldError, FormErrors, FormField, MAX_DESCRIPTION_LEN, MAX_IMAGES, MAX_NAME_LEN, NewProductForm,
    submit_new_product,
};
