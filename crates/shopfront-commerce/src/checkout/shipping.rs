//! Shipping estimate: postal code entry and address lookup.

use async_trait::async_trait;

use crate::checkout::{format_postal_code, Address, PostalCode, POSTAL_CODE_DIGITS};
use crate::error::CommerceError;

/// Shown when a search is attempted on clearly incomplete input.
pub const INVALID_POSTAL_CODE: &str = "Invalid postal code";
/// Shown when the input does not reduce to exactly eight digits.
pub const POSTAL_CODE_LENGTH: &str = "Postal code must have 8 digits";
/// Shown when the lookup endpoint knows no such code.
pub const POSTAL_CODE_NOT_FOUND: &str = "Postal code not found";
/// Shown when the lookup endpoint could not be used.
pub const POSTAL_LOOKUP_FAILED: &str = "Failed to look up postal code";

/// Resolves postal codes to addresses.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// Look up `code`.
    ///
    /// Returns `AddressNotFound` when the endpoint reports no match and
    /// `LookupFailed` for anything else that went wrong.
    async fn lookup(&self, code: &PostalCode) -> Result<Address, CommerceError>;
}

/// State of the shipping-estimate widget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShippingEstimate {
    input: String,
    address: Option<Address>,
    error: Option<String>,
    loading: bool,
}

impl ShippingEstimate {
    /// Create an empty estimate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted input and address.
    pub fn restore(input: &str, address: Option<Address>) -> Self {
        Self {
            input: format_postal_code(input),
            address,
            ..Self::default()
        }
    }

    /// Formatted input as displayed.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Address from the last successful lookup.
    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// User-facing error from the last search.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Check if a lookup is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Replace the input without looking anything up.
    ///
    /// The shown address and error no longer apply and are cleared.
    pub fn set_input(&mut self, raw: &str) {
        self.input = format_postal_code(raw);
        self.address = None;
        self.error = None;
    }

    /// Reformat new input.
    ///
    /// Returns the code to look up once exactly eight digits are present;
    /// any other input clears the shown address.
    pub fn on_input(&mut self, raw: &str) -> Option<PostalCode> {
        self.input = format_postal_code(raw);
        match PostalCode::parse(&self.input) {
            Ok(code) => {
                self.loading = true;
                self.error = None;
                Some(code)
            }
            Err(_) => {
                self.address = None;
                self.error = None;
                None
            }
        }
    }

    /// Validate the current input for an explicit search.
    ///
    /// On failure the error message is set and nothing should be sent.
    pub fn begin_search(&mut self) -> Option<PostalCode> {
        if self.input.len() < POSTAL_CODE_DIGITS {
            self.error = Some(INVALID_POSTAL_CODE.to_string());
            return None;
        }
        match PostalCode::parse(&self.input) {
            Ok(code) => {
                self.loading = true;
                self.error = None;
                Some(code)
            }
            Err(_) => {
                self.error = Some(POSTAL_CODE_LENGTH.to_string());
                None
            }
        }
    }

    /// Record a lookup result. Failures clear the address and set a message.
    pub fn apply_lookup(&mut self, result: Result<Address, CommerceError>) {
        self.loading = false;
        match result {
            Ok(address) => {
                tracing::debug!(postal_code = %address.postal_code, "address found");
                self.address = Some(address);
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(input = %self.input, error = %e, "postal code lookup failed");
                self.address = None;
                self.error = Some(lookup_error_message(&e).to_string());
            }
        }
    }

    /// Explicit search: validate, look up and record the result.
    pub async fn search<L: AddressLookup + ?Sized>(&mut self, lookup: &L) -> Option<&Address> {
        let code = self.begin_search()?;
        let result = lookup.lookup(&code).await;
        self.apply_lookup(result);
        self.address.as_ref()
    }

    /// Input handler: reformat and look up automatically when complete.
    ///
    /// Returns whether a lookup was made. Never fails; problems end up in
    /// [`error`](Self::error).
    pub async fn handle_input<L: AddressLookup + ?Sized>(&mut self, raw: &str, lookup: &L) -> bool {
        let Some(code) = self.on_input(raw) else {
            return false;
        };
        let result = lookup.lookup(&code).await;
        self.apply_lookup(result);
        true
    }
}

fn lookup_error_message(e: &CommerceError) -> &'static str {
    match e {
        CommerceError::AddressNotFound(_) => POSTAL_CODE_NOT_FOUND,
        CommerceError::InvalidPostalCode(_) => POSTAL_CODE_LENGTH,
        _ => POSTAL_LOOKUP_FAILED,
    }
}
