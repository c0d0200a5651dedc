pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;

use utoipa::OpenApi;

use crate::application::cart_service::CartService;
use crate::application::checkout_service::CheckoutService;
use crate::application::order_service::OrderService;
use crate::infrastructure::pg_store::DieselStore;

pub type Carts = CartService<DieselStore>;
pub type Orders = OrderService<DieselStore>;
pub type Checkouts = CheckoutService<DieselStore>;

#[derive(OpenApi)]
#[openapi(
    paths(
        cart::list_cart,
        cart::add_cart_item,
        cart::empty_and_add_cart_item,
        cart::update_cart_item,
        cart::delete_cart_item,
        cart::delete_cart_item_by_item,
        cart::empty_cart,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::update_order_status,
        orders::get_order_lifecycle,
        checkout::get_checkout_info,
    ),
    components(schemas(
        cart::AddCartItemRequest,
        cart::UpdateCartItemRequest,
        cart::CartItemResponse,
        cart::CartResponse,
        cart::EmptyCartResponse,
        orders::CreateOrderRequest,
        orders::UpdateOrderStatusRequest,
        orders::OrderResponse,
        orders::OrderedItemResponse,
        orders::LifecycleEntryResponse,
        orders::ListOrdersResponse,
        orders::OrderCursorResponse,
        checkout::CheckoutInfoResponse,
        checkout::DayScheduleResponse,
        checkout::ShiftResponse,
        checkout::PaymentMethodResponse,
        checkout::TimeMarginResponse,
        crate::errors::ErrorBody,
        crate::errors::FieldViolation,
    )),
    tags(
        (name = "cart", description = "Cart lines and stock reservations"),
        (name = "orders", description = "Order placement and lifecycle"),
        (name = "checkout", description = "Pre-checkout business information"),
    )
)]
pub struct ApiDoc;
