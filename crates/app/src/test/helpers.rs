//! Test Helpers

use jiff::civil::Date;
use jiff_sqlx::Date as SqlxDate;
use sewa::{
    bookings::{BookingCode, BookingStatus},
    catalog::Category,
};
use sqlx::query;

use crate::{
    domain::{
        catalog::data::NewItem,
        customers::{
            CustomersService, CustomersServiceError,
            data::NewCustomer,
            records::{CustomerUuid, Role},
        },
    },
    test::TestContext,
};

pub(crate) fn new_item(id: &str, nominal_stock: u32, price: u64) -> NewItem {
    NewItem {
        id: id.into(),
        name: format!("Kostum {id}"),
        category: Category::Fullset,
        price,
        nominal_stock,
    }
}

pub(crate) async fn create_customer(
    ctx: &TestContext,
    name: &str,
) -> Result<CustomerUuid, CustomersServiceError> {
    let issued = ctx
        .customers
        .create_customer(NewCustomer {
            uuid: CustomerUuid::new(),
            name: name.to_string(),
            role: Role::Customer,
        })
        .await?;

    Ok(issued.customer.uuid)
}

/// Rewrites a booking's status and dates directly, bypassing the lifecycle.
pub(crate) async fn set_status(
    ctx: &TestContext,
    code: &BookingCode,
    status: BookingStatus,
    pickup: Date,
    return_date: Date,
) -> Result<(), sqlx::Error> {
    query(
        "UPDATE bookings SET status = $2, pickup_date = $3, return_date = $4 WHERE code = $1",
    )
    .bind(code.as_str())
    .bind(status.as_str())
    .bind(SqlxDate::from(pickup))
    .bind(SqlxDate::from(return_date))
    .execute(ctx.db.pool())
    .await?;

    Ok(())
}
