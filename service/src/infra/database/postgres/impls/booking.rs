//! [`Booking`]-related [`Database`] implementations.

use std::collections::HashMap;

use common::{
    money::Currency,
    operations::{By, Insert, Lock, Select, Update},
    DateRange, Money,
};
use itertools::Itertools as _;
use postgres_types::ToSql;
use rust_decimal::Decimal;
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, charge, Charge, Occupancy, Payment, Rates, Totals},
        guest, Booking,
    },
    infra::{
        database::{
            self,
            postgres::{Connection, FuzzPattern},
            Postgres,
        },
        Database,
    },
    read,
};

/// Decodes a [`Charge`] out of the provided `booking_charges` row.
fn decode_charge(row: &Row, currency: Currency) -> Charge {
    Charge {
        kind: charge::Kind::from_parts(row.get("category"), row.get("other"))
            .expect("`other` is set for `Category::Other` only"),
        quantity: u16::try_from(row.get::<_, i32>("quantity"))
            .expect("`quantity` overflow"),
        unit_price: Money {
            amount: row.get("unit_price"),
            currency,
        },
        description: row.get("description"),
        charged_at: row.get("charged_at"),
        removed_at: row.get("removed_at"),
    }
}

/// Decodes a [`Payment`] out of the provided `booking_payments` row.
fn decode_payment(row: &Row, currency: Currency) -> Payment {
    Payment {
        kind: row.get("kind"),
        method: row.get("method"),
        amount: Money {
            amount: row.get("amount"),
            currency,
        },
        transaction: row.get("transaction"),
        paid_at: row.get("paid_at"),
    }
}

/// Returns ledger [`Row`]s of the [`Booking`] with the provided `id`.
fn ledger(rows: &HashMap<booking::Id, Vec<Row>>, id: booking::Id) -> &[Row] {
    rows.get(&id).map_or(&[][..], Vec::as_slice)
}

/// Decodes a [`Booking`] out of the provided `bookings` row and rows of its
/// ledgers.
fn decode_booking(row: &Row, charges: &[Row], payments: &[Row]) -> Booking {
    let currency: Currency = row.get("currency");
    let money = |column: &str| Money {
        amount: row.get(column),
        currency,
    };
    let head_count = |column: &str| {
        u8::try_from(row.get::<_, i16>(column))
            .unwrap_or_else(|_| panic!("`{column}` overflow"))
    };

    Booking {
        id: row.get("id"),
        number: row.get("number"),
        group_id: row.get("group_id"),
        guest_id: row.get("guest_id"),
        guest: guest::Info {
            full_name: row.get("guest_name"),
            national_id: row.get("guest_national_id"),
            phone: row.get("guest_phone"),
            email: row.get("guest_email"),
        },
        verification: row.get::<_, Option<guest::Name>>("verified_name").map(
            |full_name| guest::Verification {
                full_name,
                national_id: row.get("verified_national_id"),
                phone: row.get("verified_phone"),
            },
        ),
        room_id: row.get("room_id"),
        stay: DateRange::new(row.get("check_in"), row.get("check_out"))
            .expect("`bookings_stay_check` constraint"),
        occupancy: Occupancy {
            adults: head_count("adults"),
            children: head_count("children"),
        },
        price: money("price"),
        rates: Rates {
            tax: row.get("tax_rate"),
            service: row.get("service_rate"),
        },
        charges: charges.iter().map(|r| decode_charge(r, currency)).collect(),
        totals: Totals {
            subtotal: money("subtotal"),
            tax: money("tax"),
            service_charge: money("service_charge"),
            additional_charges: money("additional_charges"),
            discount: money("discount"),
            total: money("total"),
        },
        deposit: money("deposit"),
        cancellation_fee: row
            .get::<_, Option<Decimal>>("cancellation_fee")
            .map(|amount| Money { amount, currency }),
        payments: payments
            .iter()
            .map(|r| decode_payment(r, currency))
            .collect(),
        payment_status: row.get("payment_status"),
        status: row.get("status"),
        special_requests: row.get("special_requests"),
        admin_notes: row.get("admin_notes"),
        cancellation_reason: row.get("cancellation_reason"),
        failure_reason: row.get("failure_reason"),
        created_at: row.get("created_at"),
        confirmed_at: row.get("confirmed_at"),
        checked_in_at: row.get("checked_in_at"),
        checked_out_at: row.get("checked_out_at"),
        cancelled_at: row.get("cancelled_at"),
        completed_at: row.get("completed_at"),
        refunded_at: row.get("refunded_at"),
    }
}

impl<C, IDs> Database<Select<By<HashMap<booking::Id, Booking>, IDs>>>
    for Postgres<C>
where
    C: Connection,
    IDs: AsRef<[booking::Id]>,
{
    type Ok = HashMap<booking::Id, Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<HashMap<booking::Id, Booking>, IDs>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        // Avoid subtle change for SQL.
        let ids: &[booking::Id] = ids.as_ref();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        const SQL: &str = "\
            SELECT id, number, group_id, \
                   guest_id, guest_name, guest_national_id, \
                   guest_phone, guest_email, \
                   verified_name, verified_national_id, verified_phone, \
                   room_id, check_in, check_out, adults, children, \
                   currency, price, tax_rate, service_rate, \
                   subtotal, tax, service_charge, additional_charges, \
                   discount, total, deposit, cancellation_fee, \
                   payment_status, status, \
                   special_requests, admin_notes, \
                   cancellation_reason, failure_reason, \
                   created_at, confirmed_at, checked_in_at, checked_out_at, \
                   cancelled_at, completed_at, refunded_at \
            FROM bookings \
            WHERE id = ANY($1::UUID[])";
        let rows = self
            .query(SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?;

        const CHARGES_SQL: &str = "\
            SELECT booking_id, category, other, quantity, unit_price, \
                   description, charged_at, removed_at \
            FROM booking_charges \
            WHERE booking_id = ANY($1::UUID[]) \
            ORDER BY booking_id, idx";
        let charges = self
            .query(CHARGES_SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .into_group_map_by(|r| r.get::<_, booking::Id>("booking_id"));

        const PAYMENTS_SQL: &str = "\
            SELECT booking_id, kind, method, amount, transaction, paid_at \
            FROM booking_payments \
            WHERE booking_id = ANY($1::UUID[]) \
            ORDER BY booking_id, idx";
        let payments = self
            .query(PAYMENTS_SQL, &[&ids])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .into_group_map_by(|r| r.get::<_, booking::Id>("booking_id"));

        Ok(rows
            .iter()
            .map(|row| {
                let id: booking::Id = row.get("id");
                (
                    id,
                    decode_booking(
                        row,
                        ledger(&charges, id),
                        ledger(&payments, id),
                    ),
                )
            })
            .collect())
    }
}

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<booking::Id, Booking>, [booking::Id; 1]>>,
        Ok = HashMap<booking::Id, Booking>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self
            .execute(Select(By::new([id])))
            .await
            .map_err(tracerr::wrap!())?
            .remove(&id))
    }
}

impl<C> Database<Select<By<Option<Booking>, booking::Number>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<Option<Booking>, booking::Id>>,
        Ok = Option<Booking>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let number: booking::Number = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM bookings \
            WHERE number = $1::VARCHAR";
        let Some(row) = self
            .query_opt(SQL, &[&number])
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(None);
        };

        self.execute(Select(By::<Option<Booking>, _>::new(
            row.get::<_, booking::Id>("id"),
        )))
        .await
        .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Select<By<Vec<Booking>, booking::GroupId>>> for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<booking::Id, Booking>, Vec<booking::Id>>>,
        Ok = HashMap<booking::Id, Booking>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, booking::GroupId>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let group_id: booking::GroupId = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM bookings \
            WHERE group_id = $1::UUID \
            ORDER BY created_at, id";
        let ids = self
            .query(SQL, &[&group_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get::<_, booking::Id>("id"))
            .collect::<Vec<_>>();

        let mut found = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(ids.iter().filter_map(|id| found.remove(id)).collect())
    }
}

impl<C> Database<Select<By<Vec<read::booking::Hold>, read::booking::Holds>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::booking::Hold>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::booking::Hold>, read::booking::Holds>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::Holds { room_id, window } = by.into_inner();
        let (start, end) = (window.start(), window.end());

        const SQL: &str = "\
            SELECT id, number, check_in, check_out \
            FROM bookings \
            WHERE room_id = $1::UUID \
              AND status = ANY($2::INT2[]) \
              AND check_in < $4::DATE \
              AND $3::DATE < check_out \
            ORDER BY check_in, id";
        Ok(self
            .query(
                SQL,
                &[
                    &room_id,
                    &booking::Status::HOLDING.as_slice(),
                    &start,
                    &end,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| read::booking::Hold {
                booking_id: row.get("id"),
                number: row.get("number"),
                stay: DateRange::new(row.get("check_in"), row.get("check_out"))
                    .expect("`bookings_stay_check` constraint"),
            })
            .collect())
    }
}

impl<C> Database<Select<By<Vec<booking::Id>, read::booking::Overdue>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<booking::Id>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<booking::Id>, read::booking::Overdue>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::Overdue(today) = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM bookings \
            WHERE status = $1::INT2 \
              AND check_in < $2::DATE \
            ORDER BY id";
        Ok(self
            .query(SQL, &[&booking::Status::Confirmed, &today])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get("id"))
            .collect())
    }
}

impl<C>
    Database<
        Select<
            By<read::booking::list::Page, read::booking::list::Selector>,
        >,
    > for Postgres<C>
where
    C: Connection,
    Self: Database<
        Select<By<HashMap<booking::Id, Booking>, Vec<booking::Id>>>,
        Ok = HashMap<booking::Id, Booking>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = read::booking::list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::booking::list::Page, read::booking::list::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        use read::booking::list::SortField;

        let read::booking::list::Selector {
            arguments,
            filter,
            sort,
        } = by.into_inner();
        let read::booking::list::Filter {
            status,
            payment_status,
            check_in_from,
            check_in_to,
            keyword,
            national_id,
            room_id,
            group_id,
        } = filter;
        let pattern = keyword
            .as_deref()
            .and_then(|k| FuzzPattern::new(&k.to_lowercase()));
        let limit = i64::try_from(arguments.size()).expect("`size` overflow");
        let offset =
            i64::try_from(arguments.offset()).expect("`offset` overflow");

        let mut ps: Vec<&(dyn ToSql + Sync)> = vec![];
        let mut conditions = vec![];
        if let Some(s) = &status {
            ps.push(s);
            conditions.push(format!("status = ${}::INT2", ps.len()));
        }
        if let Some(s) = &payment_status {
            ps.push(s);
            conditions.push(format!("payment_status = ${}::INT2", ps.len()));
        }
        if let Some(d) = &check_in_from {
            ps.push(d);
            conditions.push(format!("check_in >= ${}::DATE", ps.len()));
        }
        if let Some(d) = &check_in_to {
            ps.push(d);
            conditions.push(format!("check_in <= ${}::DATE", ps.len()));
        }
        if let Some(id) = &room_id {
            ps.push(id);
            conditions.push(format!("room_id = ${}::UUID", ps.len()));
        }
        if let Some(id) = &group_id {
            ps.push(id);
            conditions.push(format!("group_id = ${}::UUID", ps.len()));
        }
        if let Some(id) = &national_id {
            ps.push(id);
            conditions.push(format!(
                "COALESCE(verified_national_id, guest_national_id) \
                 = ${}::VARCHAR",
                ps.len(),
            ));
        }
        if let Some(p) = &pattern {
            ps.push(p);
            let idx = ps.len();
            conditions.push(format!(
                "(LOWER(number) SIMILAR TO ${idx}::VARCHAR \
                  OR LOWER(guest_name) SIMILAR TO ${idx}::VARCHAR \
                  OR LOWER(guest_phone) SIMILAR TO ${idx}::VARCHAR \
                  OR LOWER(COALESCE(guest_email, '')) \
                     SIMILAR TO ${idx}::VARCHAR)",
            ));
        }
        let filtering = conditions
            .iter()
            .format_with("", |c, f| f(&format_args!("AND {c} ")));

        let count_sql = format!(
            "SELECT COUNT(*) AS total \
             FROM bookings \
             WHERE true {filtering}",
        );
        let total = self
            .query_opt(&count_sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .map_or(0, |row| row.get::<_, i64>("total"));

        ps.push(&limit);
        ps.push(&offset);
        let page_sql = format!(
            "SELECT id \
             FROM bookings \
             WHERE true {filtering}\
             ORDER BY {column} {order}, id {order} \
             LIMIT ${limit_idx}::INT8 OFFSET ${offset_idx}::INT8",
            filtering = conditions
                .iter()
                .format_with("", |c, f| f(&format_args!("AND {c} "))),
            column = match sort.by {
                SortField::CreatedAt => "created_at",
                SortField::CheckIn => "check_in",
                SortField::Total => "total",
            },
            order = sort.order.sql(),
            limit_idx = ps.len() - 1,
            offset_idx = ps.len(),
        );
        let ids = self
            .query(&page_sql, ps.as_slice())
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| row.get::<_, booking::Id>("id"))
            .collect::<Vec<_>>();

        let mut found = self
            .execute(Select(By::new(ids.clone())))
            .await
            .map_err(tracerr::wrap!())?;
        Ok(read::booking::list::Page {
            items: ids.iter().filter_map(|id| found.remove(id)).collect(),
            total: usize::try_from(total).expect("`total` overflow"),
            arguments,
        })
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Booking>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(booking)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            number,
            group_id,
            guest_id,
            guest,
            verification,
            room_id,
            stay,
            occupancy,
            price,
            rates,
            charges,
            totals,
            deposit,
            cancellation_fee,
            payments,
            payment_status,
            status,
            special_requests,
            admin_notes,
            cancellation_reason,
            failure_reason,
            created_at,
            confirmed_at,
            checked_in_at,
            checked_out_at,
            cancelled_at,
            completed_at,
            refunded_at,
        } = booking;

        let (check_in, check_out) = (stay.start(), stay.end());
        let adults = i16::from(occupancy.adults);
        let children = i16::from(occupancy.children);
        let verified_name = verification.as_ref().map(|v| &v.full_name);
        let verified_national_id =
            verification.as_ref().map(|v| &v.national_id);
        let verified_phone = verification.as_ref().map(|v| &v.phone);
        let cancellation_fee = cancellation_fee.map(|m| m.amount);

        const SQL: &str = "\
            INSERT INTO bookings (\
                id, number, group_id, \
                guest_id, guest_name, guest_national_id, \
                guest_phone, guest_email, \
                verified_name, verified_national_id, verified_phone, \
                room_id, check_in, check_out, adults, children, \
                currency, price, tax_rate, service_rate, \
                subtotal, tax, service_charge, additional_charges, \
                discount, total, deposit, cancellation_fee, \
                payment_status, status, \
                special_requests, admin_notes, \
                cancellation_reason, failure_reason, \
                created_at, confirmed_at, checked_in_at, checked_out_at, \
                cancelled_at, completed_at, refunded_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::UUID, \
                $4::UUID, $5::VARCHAR, $6::VARCHAR, \
                $7::VARCHAR, $8::VARCHAR, \
                $9::VARCHAR, $10::VARCHAR, $11::VARCHAR, \
                $12::UUID, $13::DATE, $14::DATE, $15::INT2, $16::INT2, \
                $17::INT2, $18::NUMERIC, $19::NUMERIC, $20::NUMERIC, \
                $21::NUMERIC, $22::NUMERIC, $23::NUMERIC, $24::NUMERIC, \
                $25::NUMERIC, $26::NUMERIC, $27::NUMERIC, $28::NUMERIC, \
                $29::INT2, $30::INT2, \
                $31::TEXT, $32::TEXT, \
                $33::TEXT, $34::TEXT, \
                $35::TIMESTAMPTZ, $36::TIMESTAMPTZ, $37::TIMESTAMPTZ, \
                $38::TIMESTAMPTZ, $39::TIMESTAMPTZ, $40::TIMESTAMPTZ, \
                $41::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET verified_name = EXCLUDED.verified_name, \
                verified_national_id = EXCLUDED.verified_national_id, \
                verified_phone = EXCLUDED.verified_phone, \
                check_in = EXCLUDED.check_in, \
                check_out = EXCLUDED.check_out, \
                subtotal = EXCLUDED.subtotal, \
                tax = EXCLUDED.tax, \
                service_charge = EXCLUDED.service_charge, \
                additional_charges = EXCLUDED.additional_charges, \
                discount = EXCLUDED.discount, \
                total = EXCLUDED.total, \
                deposit = EXCLUDED.deposit, \
                cancellation_fee = EXCLUDED.cancellation_fee, \
                payment_status = EXCLUDED.payment_status, \
                status = EXCLUDED.status, \
                special_requests = EXCLUDED.special_requests, \
                admin_notes = EXCLUDED.admin_notes, \
                cancellation_reason = EXCLUDED.cancellation_reason, \
                failure_reason = EXCLUDED.failure_reason, \
                confirmed_at = EXCLUDED.confirmed_at, \
                checked_in_at = EXCLUDED.checked_in_at, \
                checked_out_at = EXCLUDED.checked_out_at, \
                cancelled_at = EXCLUDED.cancelled_at, \
                completed_at = EXCLUDED.completed_at, \
                refunded_at = EXCLUDED.refunded_at";
        self.exec(
            SQL,
            &[
                &id,
                &number,
                &group_id,
                &guest_id,
                &guest.full_name,
                &guest.national_id,
                &guest.phone,
                &guest.email,
                &verified_name,
                &verified_national_id,
                &verified_phone,
                &room_id,
                &check_in,
                &check_out,
                &adults,
                &children,
                &price.currency,
                &price.amount,
                &rates.tax,
                &rates.service,
                &totals.subtotal.amount,
                &totals.tax.amount,
                &totals.service_charge.amount,
                &totals.additional_charges.amount,
                &totals.discount.amount,
                &totals.total.amount,
                &deposit.amount,
                &cancellation_fee,
                &payment_status,
                &status,
                &special_requests,
                &admin_notes,
                &cancellation_reason,
                &failure_reason,
                &created_at,
                &confirmed_at,
                &checked_in_at,
                &checked_out_at,
                &cancelled_at,
                &completed_at,
                &refunded_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())?;

        // Ledger entries are append-only, except for a `Charge` removal.
        const CHARGE_SQL: &str = "\
            INSERT INTO booking_charges (\
                booking_id, idx, category, other, quantity, unit_price, \
                description, charged_at, removed_at\
            ) VALUES (\
                $1::UUID, $2::INT4, $3::INT2, $4::TEXT, $5::INT4, \
                $6::NUMERIC, $7::TEXT, $8::TIMESTAMPTZ, $9::TIMESTAMPTZ\
            ) \
            ON CONFLICT (booking_id, idx) DO UPDATE \
            SET removed_at = EXCLUDED.removed_at";
        for (idx, charge) in charges.iter().enumerate() {
            let idx = i32::try_from(idx).expect("`idx` overflow");
            let quantity = i32::from(charge.quantity);
            self.exec(
                CHARGE_SQL,
                &[
                    &id,
                    &idx,
                    &charge.kind.category(),
                    &charge.kind.other(),
                    &quantity,
                    &charge.unit_price.amount,
                    &charge.description,
                    &charge.charged_at,
                    &charge.removed_at,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?;
        }

        const PAYMENT_SQL: &str = "\
            INSERT INTO booking_payments (\
                booking_id, idx, kind, method, amount, transaction, paid_at\
            ) VALUES (\
                $1::UUID, $2::INT4, $3::INT2, $4::INT2, $5::NUMERIC, \
                $6::VARCHAR, $7::TIMESTAMPTZ\
            ) \
            ON CONFLICT (booking_id, idx) DO NOTHING";
        for (idx, payment) in payments.iter().enumerate() {
            let idx = i32::try_from(idx).expect("`idx` overflow");
            self.exec(
                PAYMENT_SQL,
                &[
                    &id,
                    &idx,
                    &payment.kind,
                    &payment.method,
                    &payment.amount.amount,
                    &payment.transaction,
                    &payment.paid_at,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?;
        }

        Ok(())
    }
}

impl<C> Database<Lock<By<Booking, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: booking::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM bookings \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
