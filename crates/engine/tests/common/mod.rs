#![allow(dead_code)]

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement, Value};

use engine::{BalanceService, GroupId, MemberId, Money, SeaOrmStore};
use migration::MigratorTrait;

/// An in-memory database with the real schema plus helpers to seed rows.
///
/// Every seeded row gets a later timestamp than the previous one, so reads
/// come back in insertion order.
pub struct Fixture {
    pub db: DatabaseConnection,
    pub service: BalanceService<SeaOrmStore>,
    tick: u32,
}

pub async fn fixture() -> Fixture {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let service = BalanceService::builder().database(db.clone()).build();
    Fixture {
        db,
        service,
        tick: 0,
    }
}

pub fn group(id: &str) -> GroupId {
    GroupId::new(id).unwrap()
}

pub fn member(id: &str) -> MemberId {
    MemberId::new(id).unwrap()
}

pub fn cents(amounts: &[(&str, i64)]) -> Vec<(MemberId, Money)> {
    amounts
        .iter()
        .map(|(id, c)| (member(id), Money::new(*c)))
        .collect()
}

impl Fixture {
    pub async fn exec(&self, sql: &str, values: Vec<Value>) {
        let backend = self.db.get_database_backend();
        self.db
            .execute(Statement::from_sql_and_values(backend, sql, values))
            .await
            .unwrap();
    }

    fn stamp(&mut self) -> String {
        self.tick += 1;
        format!(
            "2025-03-01T10:{:02}:{:02}+00:00",
            self.tick / 60,
            self.tick % 60
        )
    }

    pub async fn group(&mut self, id: &str) {
        let stamp = self.stamp();
        self.exec(
            "INSERT INTO groups (id, name, description, created_at) VALUES (?, ?, ?, ?)",
            vec![id.into(), format!("Group {id}").into(), "".into(), stamp.into()],
        )
        .await;
    }

    pub async fn user(&mut self, id: &str, name: &str) {
        let stamp = self.stamp();
        self.exec(
            "INSERT OR IGNORE INTO users (id, name, email, created_at) VALUES (?, ?, ?, ?)",
            vec![
                id.into(),
                name.into(),
                format!("{id}@example.com").into(),
                stamp.into(),
            ],
        )
        .await;
    }

    /// Creates the user if needed and adds them to `group`.
    pub async fn member(&mut self, group: &str, id: &str, name: &str) {
        self.user(id, name).await;
        let stamp = self.stamp();
        self.exec(
            "INSERT INTO group_members (id, group_id, user_id, joined_at) VALUES (?, ?, ?, ?)",
            vec![
                format!("{group}:{id}").into(),
                group.into(),
                id.into(),
                stamp.into(),
            ],
        )
        .await;
    }

    pub async fn expense(
        &mut self,
        group: &str,
        id: &str,
        paid_by: &str,
        amount: &str,
        splits: &[(&str, &str)],
    ) {
        let stamp = self.stamp();
        self.exec(
            "INSERT INTO expenses (id, group_id, paid_by, amount, description, split_type, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            vec![
                id.into(),
                group.into(),
                paid_by.into(),
                amount.into(),
                "".into(),
                "exact".into(),
                stamp.into(),
            ],
        )
        .await;
        for (user, share) in splits {
            self.split(id, user, share, None).await;
        }
    }

    pub async fn split(&mut self, expense: &str, user: &str, amount: &str, percentage: Option<&str>) {
        let stamp = self.stamp();
        self.exec(
            "INSERT INTO expense_splits (id, expense_id, user_id, amount, percentage, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
            vec![
                format!("{expense}:{user}").into(),
                expense.into(),
                user.into(),
                amount.into(),
                percentage.map(str::to_string).into(),
                stamp.into(),
            ],
        )
        .await;
    }

    pub async fn settlement(&mut self, group: &str, id: &str, from: &str, to: &str, amount: &str) {
        let stamp = self.stamp();
        self.exec(
            "INSERT INTO settlements (id, group_id, from_user_id, to_user_id, amount, created_at) \
             VALUES (?, ?, ?, ?, ?, ?)",
            vec![
                id.into(),
                group.into(),
                from.into(),
                to.into(),
                amount.into(),
                stamp.into(),
            ],
        )
        .await;
    }

    /// Group `g` with Alice, Bob and Carol, in that order.
    pub async fn trio(&mut self) {
        self.group("g").await;
        self.member("g", "alice", "Alice").await;
        self.member("g", "bob", "Bob").await;
        self.member("g", "carol", "Carol").await;
    }
}
