use thiserror::Error;

/// How a [`DomainError`] should be treated by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Malformed request data, rejected before touching inventory.
    Validation,
    /// An expected business-rule outcome. Never retried.
    Domain,
    /// The referenced record does not exist. Never retried.
    NotFound,
    /// Database or pool failure; the transaction was rolled back.
    Infrastructure,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Item not found")]
    ItemNotFound,
    #[error("Cart item not found")]
    CartItemNotFound,
    #[error("Order not found")]
    OrderNotFound,
    #[error("User address not found")]
    UserAddressNotFound,
    #[error("Business not found")]
    BusinessNotFound,

    #[error("Not enough stock available for the item")]
    NoAvailability,
    #[error("The cart already holds items from another business")]
    CrossBusinessCart,
    #[error("The item is already in the cart")]
    ItemInTheCart,
    #[error("The cart is empty")]
    CartItemsNotFound,
    #[error("The order does not respect the business time margin")]
    MarginNotFulfilled,
    #[error("The business is closed during the requested window")]
    BusinessClosed,
    #[error("Status transition from {from} to {to} is not allowed")]
    StatusError { from: String, to: String },
    #[error("Business payment method not found")]
    BusinessPaymentMethodNotFound,
    #[error("The business does not accept {0} orders")]
    OrderTypeNotSupported(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DomainError::ItemNotFound
            | DomainError::CartItemNotFound
            | DomainError::OrderNotFound
            | DomainError::UserAddressNotFound
            | DomainError::BusinessNotFound => ErrorCategory::NotFound,
            DomainError::InvalidInput(_) => ErrorCategory::Validation,
            DomainError::Internal(_) => ErrorCategory::Infrastructure,
            _ => ErrorCategory::Domain,
        }
    }

    /// Stable machine-readable identifier surfaced to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::ItemNotFound => "ITEM_NOT_FOUND",
            DomainError::CartItemNotFound => "CART_ITEM_NOT_FOUND",
            DomainError::OrderNotFound => "ORDER_NOT_FOUND",
            DomainError::UserAddressNotFound => "USER_ADDRESS_NOT_FOUND",
            DomainError::BusinessNotFound => "BUSINESS_NOT_FOUND",
            DomainError::NoAvailability => "NO_AVAILABILITY",
            DomainError::CrossBusinessCart => "CROSS_BUSINESS_CART",
            DomainError::ItemInTheCart => "ITEM_IN_THE_CART",
            DomainError::CartItemsNotFound => "CART_ITEMS_NOT_FOUND",
            DomainError::MarginNotFulfilled => "MARGIN_NOT_FULFILLED",
            DomainError::BusinessClosed => "BUSINESS_CLOSED",
            DomainError::StatusError { .. } => "STATUS_ERROR",
            DomainError::BusinessPaymentMethodNotFound => "BUSINESS_PAYMENT_METHOD_NOT_FOUND",
            DomainError::OrderTypeNotSupported(_) => "ORDER_TYPE_NOT_SUPPORTED",
            DomainError::InvalidInput(_) => "INVALID_INPUT",
            DomainError::Internal(_) => "INTERNAL",
        }
    }
}
