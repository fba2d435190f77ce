//! Carts service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use sewa::{
    availability::{Availability, availability},
    bookings::BookingCode,
    cart::{Cart, CartEntry, CartError},
    catalog::{CatalogItem, ItemId},
    pricing::{self, RentalDays},
    stock,
};
use sqlx::{Postgres, Transaction};

use crate::{
    calendar::BusinessCalendar,
    database::Db,
    domain::{
        bookings::repository::PgBookingsRepository,
        carts::{
            errors::CartsServiceError,
            models::{PricedCart, PricedCartLine},
            repository::PgCartsRepository,
        },
        catalog::repository::PgCatalogRepository,
        customers::records::CustomerUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    calendar: BusinessCalendar,
    carts: PgCartsRepository,
    catalog: PgCatalogRepository,
    bookings: PgBookingsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db, calendar: BusinessCalendar) -> Self {
        Self {
            db,
            calendar,
            carts: PgCartsRepository::new(),
            catalog: PgCatalogRepository::new(),
            bookings: PgBookingsRepository::new(),
        }
    }

    async fn load_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Cart, CartsServiceError> {
        let entries = self.carts.get_entries(tx, customer).await?;

        Ok(Cart::from_entries(entries)?)
    }

    async fn current_availability(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Availability, CartsServiceError> {
        let today = self.calendar.today();
        let bookings = self.bookings.list_holding_bookings(tx, today).await?;

        Ok(availability(&bookings, today))
    }

    async fn catalog_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &ItemId,
    ) -> Result<CatalogItem, CartsServiceError> {
        self.catalog
            .get_items(tx, std::slice::from_ref(item))
            .await?
            .pop()
            .ok_or_else(|| CartsServiceError::UnknownItem(item.clone()))
    }

    /// Persists `cart` and returns it priced.
    async fn save_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        cart: &Cart,
    ) -> Result<PricedCart, CartsServiceError> {
        self.carts
            .replace_entries(tx, customer, cart.entries())
            .await?;

        self.price_cart(tx, cart).await
    }

    async fn price_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: &Cart,
    ) -> Result<PricedCart, CartsServiceError> {
        let ids: Vec<ItemId> = cart.entries().iter().map(|e| e.item_id.clone()).collect();
        let items: FxHashMap<ItemId, CatalogItem> = self
            .catalog
            .get_items(tx, &ids)
            .await?
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();

        let rental_days = cart.rental_days();
        let mut lines = Vec::with_capacity(cart.len());

        // Entries whose item left the catalog are kept but not priced.
        for entry in cart.entries() {
            let Some(item) = items.get(&entry.item_id) else {
                continue;
            };

            lines.push(PricedCartLine {
                entry: entry.clone(),
                name: item.name.clone(),
                base_price: item.price,
                rental_price: pricing::rental_price(item.price, rental_days.get())?,
                line_total: pricing::line_total(item.price, rental_days, entry.quantity)?,
            });
        }

        let subtotal = cart.subtotal(|id| items.get(id).map(|item| item.price))?;

        Ok(PricedCart {
            lines,
            rental_days,
            subtotal,
        })
    }

    /// Folds `local` into the stored cart, gating every local entry against stock.
    async fn merge_into_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        local: Vec<CartEntry>,
    ) -> Result<PricedCart, CartsServiceError> {
        let local = Cart::from_entries(local)?;
        let mut cart = self.load_cart(tx, customer).await?;

        cart.merge_local(local.entries());

        let ids: Vec<ItemId> = local.entries().iter().map(|e| e.item_id.clone()).collect();
        let items = self.catalog.get_items(tx, &ids).await?;
        let availability = self.current_availability(tx).await?;

        for entry in local.entries() {
            let item = items
                .iter()
                .find(|item| item.id == entry.item_id)
                .ok_or_else(|| CartsServiceError::UnknownItem(entry.item_id.clone()))?;

            let quantity = cart.get(&item.id).map_or(entry.quantity, |e| e.quantity);

            stock::reserve(item, availability.booked_quantity(&item.id), quantity)
                .map_err(CartError::from)?;
        }

        self.save_cart(tx, customer, &cart).await
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, customer: CustomerUuid) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let cart = self.load_cart(&mut tx, customer).await?;
        let priced = self.price_cart(&mut tx, &cart).await?;

        tx.commit().await?;

        Ok(priced)
    }

    async fn add_item(
        &self,
        customer: CustomerUuid,
        item: &ItemId,
        quantity: u32,
    ) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let item = self.catalog_item(&mut tx, item).await?;
        let availability = self.current_availability(&mut tx).await?;
        let mut cart = self.load_cart(&mut tx, customer).await?;

        cart.add(&item, availability.booked_quantity(&item.id), quantity)?;

        let priced = self.save_cart(&mut tx, customer, &cart).await?;

        tx.commit().await?;

        Ok(priced)
    }

    async fn set_quantity(
        &self,
        customer: CustomerUuid,
        item: &ItemId,
        quantity: u32,
    ) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self.load_cart(&mut tx, customer).await?;

        if cart.get(item).is_none() {
            return Err(CartsServiceError::NotFound);
        }

        let item = self.catalog_item(&mut tx, item).await?;
        let availability = self.current_availability(&mut tx).await?;

        cart.set_quantity(&item, availability.booked_quantity(&item.id), quantity)?;

        let priced = self.save_cart(&mut tx, customer, &cart).await?;

        tx.commit().await?;

        Ok(priced)
    }

    async fn remove_item(
        &self,
        customer: CustomerUuid,
        item: &ItemId,
    ) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self.load_cart(&mut tx, customer).await?;

        cart.remove(item).ok_or(CartsServiceError::NotFound)?;

        let priced = self.save_cart(&mut tx, customer, &cart).await?;

        tx.commit().await?;

        Ok(priced)
    }

    async fn set_rental_days(
        &self,
        customer: CustomerUuid,
        rental_days: RentalDays,
    ) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self.load_cart(&mut tx, customer).await?;

        cart.set_rental_days(rental_days);

        let priced = self.save_cart(&mut tx, customer, &cart).await?;

        tx.commit().await?;

        Ok(priced)
    }

    async fn sync(
        &self,
        customer: CustomerUuid,
        local: Vec<CartEntry>,
    ) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let priced = self.merge_into_cart(&mut tx, customer, local).await?;

        tx.commit().await?;

        Ok(priced)
    }

    async fn rent_again(
        &self,
        customer: CustomerUuid,
        code: &BookingCode,
    ) -> Result<PricedCart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self
            .bookings
            .get_booking(&mut tx, code, Some(customer))
            .await?;

        let rental_days = RentalDays::clamped(record.booking.period.days());

        let entries = record
            .booking
            .lines
            .iter()
            .map(|line| CartEntry {
                item_id: line.item_id.clone(),
                quantity: line.quantity,
                rental_days,
            })
            .collect();

        let priced = self.merge_into_cart(&mut tx, customer, entries).await?;

        tx.commit().await?;

        Ok(priced)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// The customer's cart, priced for its rental duration.
    async fn get_cart(&self, customer: CustomerUuid) -> Result<PricedCart, CartsServiceError>;

    /// Adds units of an item, on top of any already in the cart.
    async fn add_item(
        &self,
        customer: CustomerUuid,
        item: &ItemId,
        quantity: u32,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Replaces the quantity of an item already in the cart.
    async fn set_quantity(
        &self,
        customer: CustomerUuid,
        item: &ItemId,
        quantity: u32,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Removes an item from the cart.
    async fn remove_item(
        &self,
        customer: CustomerUuid,
        item: &ItemId,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Sets the rental duration of the whole cart.
    async fn set_rental_days(
        &self,
        customer: CustomerUuid,
        rental_days: RentalDays,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Merges a cart held by the client before login into the stored cart.
    async fn sync(
        &self,
        customer: CustomerUuid,
        local: Vec<CartEntry>,
    ) -> Result<PricedCart, CartsServiceError>;

    /// Replays a past booking's lines into the cart.
    async fn rent_again(
        &self,
        customer: CustomerUuid,
        code: &BookingCode,
    ) -> Result<PricedCart, CartsServiceError>;
}
