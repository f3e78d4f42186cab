//! [`Room`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select, Update},
    Money,
};
use tracerr::Traced;

use crate::{
    domain::{room, Room},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Option<Room>, room::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Room>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Room>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: room::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, number, name, kind, \
                   price, currency, capacity, \
                   status, is_active, created_at \
            FROM rooms \
            WHERE id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Room {
                id: row.get("id"),
                number: row.get("number"),
                name: row.get("name"),
                kind: row.get("kind"),
                price: Money {
                    amount: row.get("price"),
                    currency: row.get("currency"),
                },
                capacity: u8::try_from(row.get::<_, i16>("capacity"))
                    .ok()
                    .and_then(room::Capacity::new)
                    .expect("`capacity` out of range"),
                status: row.get("status"),
                is_active: row.get("is_active"),
                created_at: row.get("created_at"),
            }))
    }
}

impl<C> Database<Insert<Room>> for Postgres<C>
where
    C: Connection,
    Self: Database<Update<Room>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(room): Insert<Room>,
    ) -> Result<Self::Ok, Self::Err> {
        self.execute(Update(room)).await.map_err(tracerr::wrap!())
    }
}

impl<C> Database<Update<Room>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(room): Update<Room>,
    ) -> Result<Self::Ok, Self::Err> {
        let Room {
            id,
            number,
            name,
            kind,
            price,
            capacity,
            status,
            is_active,
            created_at,
        } = room;

        let capacity = i16::from(u8::from(capacity));

        const SQL: &str = "\
            INSERT INTO rooms (\
                id, number, name, kind, \
                price, currency, capacity, \
                status, is_active, created_at\
            ) VALUES (\
                $1::UUID, $2::VARCHAR, $3::VARCHAR, $4::INT2, \
                $5::NUMERIC, $6::INT2, $7::INT2, \
                $8::INT2, $9::BOOLEAN, $10::TIMESTAMPTZ\
            ) \
            ON CONFLICT (id) DO UPDATE \
            SET number = EXCLUDED.number, \
                name = EXCLUDED.name, \
                kind = EXCLUDED.kind, \
                price = EXCLUDED.price, \
                currency = EXCLUDED.currency, \
                capacity = EXCLUDED.capacity, \
                status = EXCLUDED.status, \
                is_active = EXCLUDED.is_active";
        self.exec(
            SQL,
            &[
                &id,
                &number,
                &name,
                &kind,
                &price.amount,
                &price.currency,
                &capacity,
                &status,
                &is_active,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Room, room::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Room, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: room::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM rooms \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
