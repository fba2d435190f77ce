//! Test helpers.

use std::sync::Arc;

use jiff::{
    Timestamp, ToSpan,
    civil::Date,
    tz::{TimeZone, offset},
};
use salvo::{affix_state::inject, prelude::*};
use sewa::{
    bookings::{Booking, BookingCode, BookingLine, BookingStatus, RentalPeriod},
    catalog::{CatalogItem, Category},
};
use sewa_app::{
    auth::{MockAuthService, Session},
    calendar::BusinessCalendar,
    context::AppContext,
    domain::{
        bookings::{
            MockBookingsService,
            records::{BookingRecord, BookingUuid},
        },
        carts::MockCartsService,
        catalog::{MockCatalogService, records::ItemRecord},
        customers::{
            MockCustomersService,
            records::{CustomerUuid, Role},
        },
    },
};
use testresult::TestResult;
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_CUSTOMER: CustomerUuid = CustomerUuid::from_uuid(Uuid::nil());

/// Service mocks behind a test [`State`]. Unconfigured mocks panic on any call.
#[derive(Default)]
pub(crate) struct Mocks {
    pub catalog: MockCatalogService,
    pub bookings: MockBookingsService,
    pub carts: MockCartsService,
    pub customers: MockCustomersService,
    pub auth: MockAuthService,
}

pub(crate) fn test_calendar() -> BusinessCalendar {
    BusinessCalendar::new(TimeZone::fixed(offset(7)))
}

pub(crate) fn make_item(id: &str, nominal_stock: u32, price: u64) -> ItemRecord {
    ItemRecord {
        item: CatalogItem {
            id: id.into(),
            name: format!("Kostum {id}"),
            category: Category::Fullset,
            price,
            nominal_stock,
        },
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
        deleted_at: None,
    }
}

pub(crate) fn make_booking(
    status: BookingStatus,
    pickup: Date,
    days: i64,
    lines: &[(&str, u32)],
) -> TestResult<Booking> {
    Ok(Booking {
        code: "TRX-0042-2026".parse::<BookingCode>()?,
        status,
        period: RentalPeriod::new(pickup, pickup.checked_add(days.days())?)?,
        lines: lines
            .iter()
            .map(|(item, quantity)| BookingLine {
                item_id: (*item).into(),
                quantity: *quantity,
                unit_price: 100_000,
            })
            .collect(),
        total_price: 0,
        created_at: Timestamp::UNIX_EPOCH,
    })
}

pub(crate) fn booking_record(booking: Booking) -> BookingRecord {
    BookingRecord {
        uuid: BookingUuid::new(),
        customer: TEST_CUSTOMER,
        booking,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn state_with(mocks: Mocks) -> Arc<State> {
    State::shared(AppContext {
        catalog: Arc::new(mocks.catalog),
        bookings: Arc::new(mocks.bookings),
        carts: Arc::new(mocks.carts),
        customers: Arc::new(mocks.customers),
        auth: Arc::new(mocks.auth),
        calendar: test_calendar(),
    })
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state_with(Mocks {
        auth,
        ..Mocks::default()
    })
}

#[salvo::handler]
async fn inject_customer(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_session(Session {
        customer: TEST_CUSTOMER,
        role: Role::Customer,
    });

    ctrl.call_next(req, depot, res).await;
}

#[salvo::handler]
async fn inject_admin(req: &mut Request, depot: &mut Depot, res: &mut Response, ctrl: &mut FlowCtrl) {
    depot.insert_session(Session {
        customer: TEST_CUSTOMER,
        role: Role::Admin,
    });

    ctrl.call_next(req, depot, res).await;
}

/// `route` served to an authenticated customer.
pub(crate) fn customer_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with(mocks)))
            .hoop(inject_customer)
            .push(route),
    )
}

/// `route` served to an authenticated admin.
pub(crate) fn admin_service(mocks: Mocks, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with(mocks)))
            .hoop(inject_admin)
            .push(route),
    )
}
