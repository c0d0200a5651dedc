use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::checkout_service::CheckoutInfo;
use crate::domain::catalog::{BusinessPaymentMethod, Coordinates};
use crate::domain::schedule::{DaySchedule, Shift, WeeklySchedule};
use crate::errors::{AppError, FieldViolation};

use super::Checkouts;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CheckoutInfoParams {
    /// Delivery point latitude; give both coordinates or neither.
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl CheckoutInfoParams {
    fn coordinates(&self) -> Result<Option<Coordinates>, AppError> {
        match (self.latitude, self.longitude) {
            (None, None) => Ok(None),
            (Some(latitude), Some(longitude)) => {
                let mut violations = Vec::new();
                if !(-90.0..=90.0).contains(&latitude) {
                    violations.push(FieldViolation::new("latitude", "must be within [-90, 90]"));
                }
                if !(-180.0..=180.0).contains(&longitude) {
                    violations.push(FieldViolation::new(
                        "longitude",
                        "must be within [-180, 180]",
                    ));
                }
                if violations.is_empty() {
                    Ok(Some(Coordinates::new(latitude, longitude)))
                } else {
                    Err(AppError::Validation(violations))
                }
            }
            (Some(_), None) => Err(AppError::Validation(vec![FieldViolation::new(
                "longitude",
                "required together with latitude",
            )])),
            (None, Some(_)) => Err(AppError::Validation(vec![FieldViolation::new(
                "latitude",
                "required together with longitude",
            )])),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ShiftResponse {
    /// Local time of day, `HH:MM:SS`
    pub opening: String,
    pub closing: String,
}

impl From<&Shift> for ShiftResponse {
    fn from(shift: &Shift) -> Self {
        Self {
            opening: shift.opening.format("%H:%M:%S").to_string(),
            closing: shift.closing.format("%H:%M:%S").to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DayScheduleResponse {
    /// `Mon` through `Sun`
    pub weekday: String,
    pub shifts: Vec<ShiftResponse>,
}

fn schedule_response(schedule: &WeeklySchedule) -> Vec<DayScheduleResponse> {
    schedule
        .days()
        .map(|(weekday, day): (_, &DaySchedule)| DayScheduleResponse {
            weekday: weekday.to_string(),
            shifts: day.shifts().map(ShiftResponse::from).collect(),
        })
        .collect()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentMethodResponse {
    pub id: Uuid,
    pub name: String,
    pub details: Option<String>,
}

impl From<BusinessPaymentMethod> for PaymentMethodResponse {
    fn from(method: BusinessPaymentMethod) -> Self {
        Self {
            id: method.id,
            name: method.name,
            details: method.details,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TimeMarginResponse {
    pub months: i32,
    pub days: i32,
    pub hours: i32,
    pub minutes: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CheckoutInfoResponse {
    pub business_id: Uuid,
    pub schedule: Vec<DayScheduleResponse>,
    pub payment_methods: Vec<PaymentMethodResponse>,
    pub distance_meters: Option<f64>,
    pub is_in_range: bool,
    pub time_margin: TimeMarginResponse,
    pub home_delivery: bool,
    pub to_pick_up: bool,
    pub delivery_price: String,
}

impl From<CheckoutInfo> for CheckoutInfoResponse {
    fn from(info: CheckoutInfo) -> Self {
        Self {
            business_id: info.business_id,
            schedule: schedule_response(&info.schedule),
            payment_methods: info
                .payment_methods
                .into_iter()
                .map(PaymentMethodResponse::from)
                .collect(),
            distance_meters: info.distance_meters,
            is_in_range: info.is_in_range,
            time_margin: TimeMarginResponse {
                months: info.time_margin.months,
                days: info.time_margin.days,
                hours: info.time_margin.hours,
                minutes: info.time_margin.minutes,
            },
            home_delivery: info.home_delivery,
            to_pick_up: info.to_pick_up,
            delivery_price: info.delivery_price.to_string(),
        }
    }
}

/// GET /businesses/{id}/checkout-info
///
/// Everything a client needs before placing an order with the business.
#[utoipa::path(
    get,
    path = "/businesses/{id}/checkout-info",
    params(
        ("id" = Uuid, Path, description = "Business UUID"),
        CheckoutInfoParams,
    ),
    responses(
        (status = 200, description = "Checkout information", body = CheckoutInfoResponse),
        (status = 400, description = "Invalid coordinates"),
        (status = 404, description = "Business not found"),
    ),
    tag = "checkout"
)]
pub async fn get_checkout_info(
    checkouts: web::Data<Checkouts>,
    path: web::Path<Uuid>,
    query: web::Query<CheckoutInfoParams>,
) -> Result<HttpResponse, AppError> {
    let business_id = path.into_inner();
    let from = query.coordinates()?;

    let info = web::block(move || checkouts.get_checkout_info(business_id, from))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(CheckoutInfoResponse::from(info)))
}
