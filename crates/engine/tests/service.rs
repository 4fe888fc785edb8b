mod common;

use std::sync::Mutex;

use common::{fixture, group, member};
use engine::{
    BalanceService, EngineError, ExpenseId, ExpenseRecord, GroupId, LedgerStore, Loaded, Member,
    MemberId, Money, SettlementRecord, SplitRecord,
};
use sea_orm::{ConnectionTrait, DbErr, Statement};

#[tokio::test]
async fn record_settlement_persists_and_signals_refresh() {
    let mut fx = fixture().await;
    fx.trio().await;
    fx.expense(
        "g",
        "taxi",
        "alice",
        "60",
        &[("alice", "20"), ("bob", "20"), ("carol", "20")],
    )
    .await;

    let mut refresh = fx.service.subscribe();
    assert_eq!(fx.service.generation(), 0);

    let settlement = fx
        .service
        .record_settlement(&group("g"), &member("bob"), &member("alice"), Money::new(2000))
        .await
        .unwrap();
    assert_eq!(settlement.amount, Money::new(2000));
    assert_eq!(fx.service.generation(), 1);
    assert!(refresh.has_changed().unwrap());
    refresh.mark_unchanged();

    let row = fx
        .db
        .query_one(Statement::from_sql_and_values(
            fx.db.get_database_backend(),
            "SELECT from_user_id, to_user_id, amount FROM settlements WHERE id = ?",
            vec![settlement.id.to_string().into()],
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.try_get::<String>("", "from_user_id").unwrap(), "bob");
    assert_eq!(row.try_get::<String>("", "to_user_id").unwrap(), "alice");
    assert_eq!(row.try_get::<String>("", "amount").unwrap(), "20.00");

    let view = fx.service.group_balances(&group("g")).await.unwrap();
    assert_eq!(view.balances[1].amount, Money::ZERO);
    assert_eq!(view.transfers.len(), 1);
    assert_eq!(view.transfers[0].from, member("carol"));
}

#[tokio::test]
async fn settling_every_proposed_transfer_clears_the_group() {
    let mut fx = fixture().await;
    fx.trio().await;
    fx.expense("g", "e1", "alice", "90", &[("bob", "45"), ("carol", "45")])
        .await;
    fx.expense("g", "e2", "bob", "30", &[("alice", "10"), ("carol", "20")])
        .await;

    let plan = fx.service.group_balances(&group("g")).await.unwrap();
    assert!(!plan.is_settled());
    for transfer in &plan.transfers {
        fx.service
            .settle_transfer(&group("g"), &transfer.from, transfer)
            .await
            .unwrap();
    }

    let after = fx.service.group_balances(&group("g")).await.unwrap();
    assert!(after.is_settled());
    assert!(after.balances.iter().all(|b| b.amount.is_zero()));
    assert_eq!(fx.service.generation(), plan.transfers.len() as u64);
}

#[tokio::test]
async fn only_a_party_may_confirm() {
    let mut fx = fixture().await;
    fx.trio().await;

    let err = fx
        .service
        .settle_as(
            &group("g"),
            &member("carol"),
            &member("bob"),
            &member("alice"),
            Money::new(500),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotParticipant(_)));

    fx.service
        .settle_as(
            &group("g"),
            &member("alice"),
            &member("bob"),
            &member("alice"),
            Money::new(500),
        )
        .await
        .unwrap();
    assert_eq!(fx.service.generation(), 1);
}

#[tokio::test]
async fn invalid_settlements_are_rejected_without_refresh() {
    let mut fx = fixture().await;
    fx.trio().await;
    fx.user("dave", "Dave").await;
    let g = group("g");

    let err = fx
        .service
        .record_settlement(&g, &member("bob"), &member("bob"), Money::new(100))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransfer(_)));

    let err = fx
        .service
        .record_settlement(&g, &member("bob"), &member("alice"), Money::ZERO)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransfer(_)));

    let err = fx
        .service
        .record_settlement(&g, &member("dave"), &member("alice"), Money::new(100))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = fx
        .service
        .record_settlement(&group("nope"), &member("bob"), &member("alice"), Money::new(100))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    assert_eq!(fx.service.generation(), 0);
    let view = fx.service.group_balances(&g).await.unwrap();
    assert!(view.is_settled());
}

/// Store holding two members whose writes always fail.
struct FailingStore {
    members: Vec<Member>,
    writes: Mutex<usize>,
}

impl FailingStore {
    fn new() -> Self {
        Self {
            members: vec![
                Member::new(member("alice"), "Alice"),
                Member::new(member("bob"), "Bob"),
            ],
            writes: Mutex::new(0),
        }
    }
}

impl LedgerStore for FailingStore {
    async fn fetch_members(&self, _: &GroupId) -> Result<Loaded<Member>, EngineError> {
        Ok(Loaded::new(self.members.clone()))
    }

    async fn fetch_expenses(&self, _: &GroupId) -> Result<Loaded<ExpenseRecord>, EngineError> {
        Ok(Loaded::new(vec![ExpenseRecord::new(
            ExpenseId::new("e1").unwrap(),
            member("alice"),
            Money::new(1000),
        )]))
    }

    async fn fetch_splits(&self, _: &[ExpenseId]) -> Result<Loaded<SplitRecord>, EngineError> {
        Ok(Loaded::new(vec![SplitRecord::new(
            ExpenseId::new("e1").unwrap(),
            member("bob"),
            Money::new(1000),
        )]))
    }

    async fn fetch_settlements(
        &self,
        _: &GroupId,
    ) -> Result<Loaded<SettlementRecord>, EngineError> {
        Ok(Loaded::default())
    }

    async fn insert_settlement(
        &self,
        _: &GroupId,
        _: &MemberId,
        _: &MemberId,
        _: Money,
    ) -> Result<SettlementRecord, EngineError> {
        *self.writes.lock().unwrap() += 1;
        Err(DbErr::Custom("disk full".to_string()).into())
    }
}

#[tokio::test]
async fn failed_write_leaves_balances_and_generation_alone() {
    let service = BalanceService::new(FailingStore::new());
    let g = group("g");
    let before = service.group_balances(&g).await.unwrap();
    let refresh = service.subscribe();

    let err = service
        .settle_transfer(&g, &member("bob"), &before.transfers[0])
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Database(_)));
    assert_eq!(*service.store().writes.lock().unwrap(), 1);
    assert_eq!(service.generation(), 0);
    assert!(!refresh.has_changed().unwrap());

    let after = service.group_balances(&g).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn notify_changed_wakes_subscribers() {
    let service = BalanceService::new(FailingStore::new());
    let mut refresh = service.subscribe();

    service.notify_changed();
    refresh.changed().await.unwrap();
    assert_eq!(*refresh.borrow_and_update(), 1);
}
