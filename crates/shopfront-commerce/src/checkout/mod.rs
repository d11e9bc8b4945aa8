//! Checkout module.
//!
//! Contains addresses, postal-code handling, the shipping estimate and the
//! checkout submission.

mod address;
mod order;
mod postal;
mod shipping;

pub use address::Address;
pub use order::{
    build_checkout, checkout, CheckoutGateway, CheckoutLine, CheckoutOutcome,
    CHECKOUT_FAILURE_MESSAGE, CHECKOUT_SUCCESS_MESSAGE,
};
pub use postal::{format_postal_code, postal_digits, PostalCode, POSTAL_CODE_DIGITS};
pub use shipping::{
    AddressLookup, ShippingEstimate, INVALID_POSTAL_CODE, POSTAL_CODE_LENGTH,
    POSTAL_CODE_NOT_FOUND, POSTAL_LOOKUP_FAILED,
};
