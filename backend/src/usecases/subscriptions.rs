use std::sync::Arc;

use anyhow::anyhow;
use chrono::Utc;
use membership_core::domain::{
    entities::{
        subscriptions::{
            InsertSubscriptionEntity, SubscriptionEntity, SubscriptionPlan,
            UpdateSubscriptionEntity,
        },
        vouchers::VoucherEntity,
    },
    repositories::{
        products::ProductRepository, subscriptions::SubscriptionRepository,
        users::UserRepository, vouchers::VoucherStore,
    },
    value_objects::{
        enums::subscription_actions::SubscriptionAction,
        subscriptions::{SubscriptionDto, SubscriptionSchedule, remaining_term},
    },
};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{
    discount::{apply_discount_on_price, apply_discount_on_tax},
    errors::{UseCaseError, UseCaseResult},
};

/// Subscription lifecycle: subscribe, read, pause, resume and unsubscribe.
///
/// Mutations are read-then-write against the repository with no version check, so two
/// concurrent actions on one subscription can interleave.
pub struct SubscriptionUseCase<U, P, S, V>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    V: VoucherStore + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    product_repo: Arc<P>,
    subscription_repo: Arc<S>,
    voucher_store: Arc<V>,
    trial_period_months: u32,
}

impl<U, P, S, V> SubscriptionUseCase<U, P, S, V>
where
    U: UserRepository + Send + Sync + 'static,
    P: ProductRepository + Send + Sync + 'static,
    S: SubscriptionRepository + Send + Sync + 'static,
    V: VoucherStore + Send + Sync + 'static,
{
    pub fn new(
        user_repo: Arc<U>,
        product_repo: Arc<P>,
        subscription_repo: Arc<S>,
        voucher_store: Arc<V>,
        trial_period_months: u32,
    ) -> Self {
        Self {
            user_repo,
            product_repo,
            subscription_repo,
            voucher_store,
            trial_period_months,
        }
    }

    pub async fn subscribe(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        plan_id: Uuid,
        voucher_id: Option<String>,
    ) -> UseCaseResult<SubscriptionDto> {
        info!(
            %user_id,
            %product_id,
            %plan_id,
            voucher_id = voucher_id.as_deref().unwrap_or(""),
            "subscriptions: subscribe requested"
        );

        let voucher = self.resolve_voucher(voucher_id.as_deref()).await?;

        let user = self.user_repo.find_by_id(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "subscriptions: failed to load user");
            UseCaseError::Internal(err)
        })?;
        if user.is_none() {
            let err = UseCaseError::DataNotFound("user");
            warn!(%user_id, status = err.status_code().as_u16(), "subscriptions: user not found");
            return Err(err);
        }

        if let Some(existing) = self
            .subscription_repo
            .find_active_by_user_and_product(user_id, product_id)
            .await
            .map_err(|err| {
                error!(
                    %user_id,
                    %product_id,
                    db_error = ?err,
                    "subscriptions: failed to look up active subscription"
                );
                UseCaseError::Internal(err)
            })?
        {
            info!(
                %user_id,
                %product_id,
                subscription_id = %existing.id,
                "subscriptions: active subscription already exists"
            );
            return Ok(SubscriptionDto::from(existing));
        }

        let product = self
            .product_repo
            .find_by_id(product_id)
            .await
            .map_err(|err| {
                error!(%product_id, db_error = ?err, "subscriptions: failed to load product");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                let err = UseCaseError::DataNotFound("product");
                warn!(%product_id, status = err.status_code().as_u16(), "subscriptions: product not found");
                err
            })?;

        let plan = product.find_plan(plan_id).ok_or_else(|| {
            let err = UseCaseError::DataNotFound("product plan");
            warn!(
                %product_id,
                %plan_id,
                status = err.status_code().as_u16(),
                "subscriptions: plan not found on product"
            );
            err
        })?;

        let price = apply_discount_on_price(&plan.price, voucher.as_ref()).map_err(|err| {
            warn!(%plan_id, error = %err, "subscriptions: failed to discount price");
            UseCaseError::from(err)
        })?;
        let tax = apply_discount_on_tax(&plan.price, &plan.tax, voucher.as_ref()).map_err(|err| {
            warn!(%plan_id, error = %err, "subscriptions: failed to discount tax");
            UseCaseError::from(err)
        })?;

        let now = Utc::now();
        let schedule =
            SubscriptionSchedule::compute(now, self.trial_period_months, plan.length_months)
                .ok_or_else(|| {
                    UseCaseError::Internal(anyhow!(
                        "subscription dates out of range for plan {plan_id}"
                    ))
                })?;

        let insert_subscription_entity = InsertSubscriptionEntity {
            user_id,
            product_id,
            plan: SubscriptionPlan {
                length_months: plan.length_months,
                price,
                tax,
                voucher_id: voucher.map(|voucher| voucher.id),
            },
            trial_date: schedule.trial_date,
            start_date: schedule.start_date,
            end_date: Some(schedule.end_date),
            is_paused: false,
            is_active: true,
        };

        let subscription_id = self
            .subscription_repo
            .create(insert_subscription_entity)
            .await
            .map_err(|err| {
                error!(%user_id, %product_id, db_error = ?err, "subscriptions: failed to create subscription");
                UseCaseError::Internal(err)
            })?;

        let subscription = self
            .subscription_repo
            .find_by_id(subscription_id)
            .await
            .map_err(|err| {
                error!(%subscription_id, db_error = ?err, "subscriptions: failed to reload subscription");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                error!(%subscription_id, "subscriptions: created subscription is missing");
                UseCaseError::Internal(anyhow!("subscription {subscription_id} missing after create"))
            })?;

        info!(%user_id, %subscription_id, "subscriptions: subscription created");
        Ok(SubscriptionDto::from(subscription))
    }

    pub async fn fetch(
        &self,
        user_id: Uuid,
        subscription_id: Uuid,
    ) -> UseCaseResult<SubscriptionDto> {
        info!(%user_id, %subscription_id, "subscriptions: fetch requested");
        let subscription = self.load_owned(user_id, subscription_id).await?;
        Ok(SubscriptionDto::from(subscription))
    }

    pub async fn list(&self, user_id: Uuid) -> UseCaseResult<Vec<SubscriptionDto>> {
        info!(%user_id, "subscriptions: listing subscriptions for user");

        let user = self.user_repo.find_by_id(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "subscriptions: failed to load user");
            UseCaseError::Internal(err)
        })?;
        if user.is_none() {
            let err = UseCaseError::DataNotFound("user");
            warn!(%user_id, status = err.status_code().as_u16(), "subscriptions: user not found");
            return Err(err);
        }

        let subscriptions = self
            .subscription_repo
            .list_by_user(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "subscriptions: failed to list subscriptions");
                UseCaseError::Internal(err)
            })?;

        let subscription_count = subscriptions.len();
        info!(%user_id, subscription_count, "subscriptions: subscriptions loaded");
        Ok(subscriptions.into_iter().map(SubscriptionDto::from).collect())
    }

    pub async fn apply_action(
        &self,
        user_id: Uuid,
        subscription_id: Uuid,
        action: SubscriptionAction,
    ) -> UseCaseResult<SubscriptionDto> {
        match action {
            SubscriptionAction::Pause => self.pause(user_id, subscription_id).await,
            SubscriptionAction::Resume => self.resume(user_id, subscription_id).await,
            SubscriptionAction::Unsubscribe => self.unsubscribe(user_id, subscription_id).await,
        }
    }

    pub async fn pause(
        &self,
        user_id: Uuid,
        subscription_id: Uuid,
    ) -> UseCaseResult<SubscriptionDto> {
        info!(%user_id, %subscription_id, "subscriptions: pause requested");
        let subscription = self.load_owned(user_id, subscription_id).await?;

        if !subscription.is_active {
            let err = UseCaseError::Forbidden("subscription is inactive");
            warn!(%subscription_id, status = err.status_code().as_u16(), "subscriptions: cannot pause inactive subscription");
            return Err(err);
        }
        if subscription.is_paused {
            info!(%subscription_id, "subscriptions: already paused");
            return Ok(SubscriptionDto::from(subscription));
        }

        let now = Utc::now();
        if now < subscription.trial_date {
            let err = UseCaseError::Forbidden("subscription is still in its trial period");
            warn!(
                %subscription_id,
                trial_date = %subscription.trial_date,
                status = err.status_code().as_u16(),
                "subscriptions: pause rejected during trial"
            );
            return Err(err);
        }

        let paused = self
            .persist(subscription_id, UpdateSubscriptionEntity::pause(now))
            .await?;

        info!(%subscription_id, "subscriptions: subscription paused");
        Ok(SubscriptionDto::from(paused))
    }

    pub async fn resume(
        &self,
        user_id: Uuid,
        subscription_id: Uuid,
    ) -> UseCaseResult<SubscriptionDto> {
        info!(%user_id, %subscription_id, "subscriptions: resume requested");
        let subscription = self.load_owned(user_id, subscription_id).await?;

        if !subscription.is_active {
            let err = UseCaseError::Forbidden("subscription is inactive");
            warn!(%subscription_id, status = err.status_code().as_u16(), "subscriptions: cannot resume inactive subscription");
            return Err(err);
        }
        if !subscription.is_paused {
            info!(%subscription_id, "subscriptions: not paused");
            return Ok(SubscriptionDto::from(subscription));
        }

        let pause_date = subscription.pause_date.ok_or_else(|| {
            error!(%subscription_id, "subscriptions: paused subscription has no pause date");
            UseCaseError::Internal(anyhow!(
                "paused subscription {subscription_id} has no pause date"
            ))
        })?;

        let now = Utc::now();
        let end_date = remaining_term(
            subscription.start_date,
            subscription.plan.length_months,
            pause_date,
        )
        .and_then(|remaining| now.checked_add_signed(remaining))
        .ok_or_else(|| {
            UseCaseError::Internal(anyhow!(
                "resume end date out of range for subscription {subscription_id}"
            ))
        })?;

        let resumed = self
            .persist(subscription_id, UpdateSubscriptionEntity::resume(end_date, now))
            .await?;

        info!(%subscription_id, %end_date, "subscriptions: subscription resumed");
        Ok(SubscriptionDto::from(resumed))
    }

    pub async fn unsubscribe(
        &self,
        user_id: Uuid,
        subscription_id: Uuid,
    ) -> UseCaseResult<SubscriptionDto> {
        info!(%user_id, %subscription_id, "subscriptions: unsubscribe requested");
        let subscription = self.load_owned(user_id, subscription_id).await?;

        if !subscription.is_active {
            info!(%subscription_id, "subscriptions: already inactive");
            return Ok(SubscriptionDto::from(subscription));
        }

        let deactivated = self
            .persist(subscription_id, UpdateSubscriptionEntity::deactivate(Utc::now()))
            .await?;

        info!(%subscription_id, "subscriptions: subscription deactivated");
        Ok(SubscriptionDto::from(deactivated))
    }

    /// Empty ids mean no voucher. Unknown or inactive vouchers are rejected.
    async fn resolve_voucher(
        &self,
        voucher_id: Option<&str>,
    ) -> UseCaseResult<Option<VoucherEntity>> {
        let Some(voucher_id) = voucher_id.map(str::trim).filter(|id| !id.is_empty()) else {
            return Ok(None);
        };

        let exists = self.voucher_store.exists(voucher_id).await.map_err(|err| {
            error!(voucher_id, error = ?err, "subscriptions: failed to check voucher");
            UseCaseError::Internal(err)
        })?;

        let voucher = if exists {
            self.voucher_store.load(voucher_id).await.map_err(|err| {
                error!(voucher_id, error = ?err, "subscriptions: failed to load voucher");
                UseCaseError::Internal(err)
            })?
        } else {
            None
        };

        match voucher {
            Some(voucher) if voucher.is_active => Ok(Some(voucher)),
            _ => {
                let err = UseCaseError::InvalidArgument("invalid voucher".to_string());
                warn!(
                    voucher_id,
                    status = err.status_code().as_u16(),
                    "subscriptions: voucher missing or inactive"
                );
                Err(err)
            }
        }
    }

    /// Subscriptions owned by another user are reported as missing.
    async fn load_owned(
        &self,
        user_id: Uuid,
        subscription_id: Uuid,
    ) -> UseCaseResult<SubscriptionEntity> {
        let subscription = self
            .subscription_repo
            .find_by_id(subscription_id)
            .await
            .map_err(|err| {
                error!(%subscription_id, db_error = ?err, "subscriptions: failed to load subscription");
                UseCaseError::Internal(err)
            })?;

        match subscription {
            Some(subscription) if subscription.user_id == user_id => Ok(subscription),
            _ => {
                let err = UseCaseError::DataNotFound("subscription");
                warn!(
                    %user_id,
                    %subscription_id,
                    status = err.status_code().as_u16(),
                    "subscriptions: subscription not found"
                );
                Err(err)
            }
        }
    }

    async fn persist(
        &self,
        subscription_id: Uuid,
        update_subscription_entity: UpdateSubscriptionEntity,
    ) -> UseCaseResult<SubscriptionEntity> {
        self.subscription_repo
            .update_fields(subscription_id, update_subscription_entity)
            .await
            .map_err(|err| {
                error!(%subscription_id, db_error = ?err, "subscriptions: failed to update subscription");
                UseCaseError::Internal(err)
            })?
            .ok_or_else(|| {
                warn!(%subscription_id, "subscriptions: subscription vanished before update");
                UseCaseError::DataNotFound("subscription")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Months};
    use membership_core::{
        domain::{
            entities::{
                products::{ProductEntity, ProductPlanEntity},
                users::UserEntity,
            },
            repositories::{
                products::MockProductRepository, subscriptions::MockSubscriptionRepository,
                users::MockUserRepository,
            },
            value_objects::{
                enums::{subscription_states::SubscriptionState, voucher_types::VoucherType},
                money::Money,
            },
        },
        infra::memory::vouchers::InMemoryVoucherStore,
    };
    use mockall::predicate::eq;
    use std::sync::Mutex;

    type TestUseCase = SubscriptionUseCase<
        MockUserRepository,
        MockProductRepository,
        MockSubscriptionRepository,
        InMemoryVoucherStore,
    >;

    fn use_case(
        user_repo: MockUserRepository,
        product_repo: MockProductRepository,
        subscription_repo: MockSubscriptionRepository,
        voucher_store: InMemoryVoucherStore,
    ) -> TestUseCase {
        SubscriptionUseCase::new(
            Arc::new(user_repo),
            Arc::new(product_repo),
            Arc::new(subscription_repo),
            Arc::new(voucher_store),
            1,
        )
    }

    fn eur(amount: &str) -> Money {
        Money::new("EUR", amount)
    }

    fn sample_user(id: Uuid) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_product(id: Uuid, plan_id: Uuid, price: &str, tax: &str) -> ProductEntity {
        let now = Utc::now();
        ProductEntity {
            id,
            name: "Gym".to_string(),
            plans: vec![ProductPlanEntity {
                id: plan_id,
                product_id: id,
                length_months: 6,
                price: eur(price),
                tax: eur(tax),
            }],
            created_at: now,
            updated_at: now,
        }
    }

    /// Active subscription whose trial ended `days_since_trial` days ago (negative: still in trial).
    fn sample_subscription(user_id: Uuid, days_since_trial: i64) -> SubscriptionEntity {
        let now = Utc::now();
        let trial_date = now - Duration::days(days_since_trial);
        let start_date = trial_date + Duration::hours(1);
        SubscriptionEntity {
            id: Uuid::new_v4(),
            user_id,
            product_id: Uuid::new_v4(),
            plan: SubscriptionPlan {
                length_months: 6,
                price: eur("100.00"),
                tax: eur("10.00"),
                voucher_id: None,
            },
            trial_date,
            start_date,
            end_date: start_date.checked_add_months(Months::new(6)),
            pause_date: None,
            is_paused: false,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn from_insert(id: Uuid, insert: InsertSubscriptionEntity) -> SubscriptionEntity {
        let now = Utc::now();
        SubscriptionEntity {
            id,
            user_id: insert.user_id,
            product_id: insert.product_id,
            plan: insert.plan,
            trial_date: insert.trial_date,
            start_date: insert.start_date,
            end_date: insert.end_date,
            pause_date: None,
            is_paused: insert.is_paused,
            is_active: insert.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    async fn store_with(
        voucher_id: &str,
        voucher_type: VoucherType,
        value: &str,
        is_active: bool,
    ) -> InMemoryVoucherStore {
        let store = InMemoryVoucherStore::new();
        store
            .save(
                voucher_id,
                VoucherEntity {
                    id: voucher_id.to_string(),
                    voucher_type,
                    discount_value: value.to_string(),
                    is_active,
                },
            )
            .await
            .unwrap();
        store
    }

    fn expect_user(user_repo: &mut MockUserRepository, user_id: Uuid) {
        let user = sample_user(user_id);
        user_repo
            .expect_find_by_id()
            .with(eq(user_id))
            .returning(move |_| {
                let user = user.clone();
                Box::pin(async move { Ok(Some(user)) })
            });
    }

    fn expect_subscription(
        subscription_repo: &mut MockSubscriptionRepository,
        subscription: &SubscriptionEntity,
    ) {
        let subscription = subscription.clone();
        subscription_repo
            .expect_find_by_id()
            .with(eq(subscription.id))
            .returning(move |_| {
                let subscription = subscription.clone();
                Box::pin(async move { Ok(Some(subscription)) })
            });
    }

    /// Echoes the update back onto `subscription`, like the storage layer would.
    fn expect_update(
        subscription_repo: &mut MockSubscriptionRepository,
        subscription: &SubscriptionEntity,
        captured: Arc<Mutex<Option<UpdateSubscriptionEntity>>>,
    ) {
        let subscription = subscription.clone();
        subscription_repo
            .expect_update_fields()
            .times(1)
            .returning(move |_, update| {
                let mut updated = subscription.clone();
                update.apply_to(&mut updated);
                *captured.lock().unwrap() = Some(update);
                Box::pin(async move { Ok(Some(updated)) })
            });
    }

    #[tokio::test]
    async fn subscribe_bakes_discount_and_schedule_into_the_subscription() {
        let (user_id, product_id, plan_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let subscription_id = Uuid::new_v4();

        let mut user_repo = MockUserRepository::new();
        let mut product_repo = MockProductRepository::new();
        let mut subscription_repo = MockSubscriptionRepository::new();
        let voucher_store = store_with("FIVE", VoucherType::FixedAmount, "5", true).await;

        expect_user(&mut user_repo, user_id);
        subscription_repo
            .expect_find_active_by_user_and_product()
            .with(eq(user_id), eq(product_id))
            .returning(|_, _| Box::pin(async { Ok(None) }));
        let product = sample_product(product_id, plan_id, "100.00", "10.00");
        product_repo
            .expect_find_by_id()
            .with(eq(product_id))
            .returning(move |_| {
                let product = product.clone();
                Box::pin(async move { Ok(Some(product)) })
            });

        let inserted: Arc<Mutex<Option<InsertSubscriptionEntity>>> = Arc::new(Mutex::new(None));
        let inserted_for_create = Arc::clone(&inserted);
        subscription_repo
            .expect_create()
            .times(1)
            .returning(move |insert| {
                *inserted_for_create.lock().unwrap() = Some(insert);
                Box::pin(async move { Ok(subscription_id) })
            });
        let inserted_for_find = Arc::clone(&inserted);
        subscription_repo
            .expect_find_by_id()
            .with(eq(subscription_id))
            .returning(move |id| {
                let insert = inserted_for_find.lock().unwrap().clone();
                Box::pin(async move { Ok(insert.map(|insert| from_insert(id, insert))) })
            });

        let before = Utc::now();
        let subscription = use_case(user_repo, product_repo, subscription_repo, voucher_store)
            .subscribe(user_id, product_id, plan_id, Some("FIVE".to_string()))
            .await
            .unwrap();

        assert_eq!(subscription.id, subscription_id);
        assert_eq!(subscription.plan.price, eur("95.00"));
        assert_eq!(subscription.plan.tax, eur("9.50"));
        assert_eq!(subscription.plan.voucher_id.as_deref(), Some("FIVE"));
        assert_eq!(subscription.state, SubscriptionState::Active);
        assert!(subscription.trial_date >= before.checked_add_months(Months::new(1)).unwrap());
        assert_eq!(subscription.start_date, subscription.trial_date + Duration::hours(1));
        assert_eq!(
            subscription.end_date,
            subscription.start_date.checked_add_months(Months::new(6))
        );
        assert_eq!(subscription.pause_date, None);
    }

    #[tokio::test]
    async fn subscribe_returns_existing_active_subscription() {
        let user_id = Uuid::new_v4();
        let existing = sample_subscription(user_id, 5);
        let product_id = existing.product_id;

        let mut user_repo = MockUserRepository::new();
        let mut product_repo = MockProductRepository::new();
        let mut subscription_repo = MockSubscriptionRepository::new();

        expect_user(&mut user_repo, user_id);
        let found = existing.clone();
        subscription_repo
            .expect_find_active_by_user_and_product()
            .with(eq(user_id), eq(product_id))
            .returning(move |_, _| {
                let found = found.clone();
                Box::pin(async move { Ok(Some(found)) })
            });
        product_repo.expect_find_by_id().times(0);
        subscription_repo.expect_create().times(0);

        let use_case = use_case(
            user_repo,
            product_repo,
            subscription_repo,
            InMemoryVoucherStore::new(),
        );

        let first = use_case
            .subscribe(user_id, product_id, Uuid::new_v4(), None)
            .await
            .unwrap();
        let second = use_case
            .subscribe(user_id, product_id, Uuid::new_v4(), None)
            .await
            .unwrap();

        assert_eq!(first.id, existing.id);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn inactive_voucher_is_rejected_before_anything_else() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_id().times(0);
        let voucher_store = store_with("OLD", VoucherType::Percentage, "10", false).await;

        let err = use_case(
            user_repo,
            MockProductRepository::new(),
            MockSubscriptionRepository::new(),
            voucher_store,
        )
        .subscribe(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Some("OLD".to_string()))
        .await
        .unwrap_err();

        assert!(matches!(err, UseCaseError::InvalidArgument(ref msg) if msg == "invalid voucher"));
    }

    #[tokio::test]
    async fn unknown_voucher_is_rejected() {
        let err = use_case(
            MockUserRepository::new(),
            MockProductRepository::new(),
            MockSubscriptionRepository::new(),
            InMemoryVoucherStore::new(),
        )
        .subscribe(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Some("NOPE".to_string()))
        .await
        .unwrap_err();

        assert!(matches!(err, UseCaseError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn subscribe_reports_missing_user_and_plan() {
        let (user_id, product_id) = (Uuid::new_v4(), Uuid::new_v4());

        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));
        let err = use_case(
            user_repo,
            MockProductRepository::new(),
            MockSubscriptionRepository::new(),
            InMemoryVoucherStore::new(),
        )
        .subscribe(user_id, product_id, Uuid::new_v4(), None)
        .await
        .unwrap_err();
        assert!(matches!(err, UseCaseError::DataNotFound("user")));

        let mut user_repo = MockUserRepository::new();
        let mut product_repo = MockProductRepository::new();
        let mut subscription_repo = MockSubscriptionRepository::new();
        expect_user(&mut user_repo, user_id);
        subscription_repo
            .expect_find_active_by_user_and_product()
            .returning(|_, _| Box::pin(async { Ok(None) }));
        let product = sample_product(product_id, Uuid::new_v4(), "100.00", "10.00");
        product_repo.expect_find_by_id().returning(move |_| {
            let product = product.clone();
            Box::pin(async move { Ok(Some(product)) })
        });

        let err = use_case(
            user_repo,
            product_repo,
            subscription_repo,
            InMemoryVoucherStore::new(),
        )
        .subscribe(user_id, product_id, Uuid::new_v4(), Some(String::new()))
        .await
        .unwrap_err();
        assert!(matches!(err, UseCaseError::DataNotFound("product plan")));
    }

    #[tokio::test]
    async fn malformed_plan_price_is_a_client_error() {
        let (user_id, product_id, plan_id) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        let mut user_repo = MockUserRepository::new();
        let mut product_repo = MockProductRepository::new();
        let mut subscription_repo = MockSubscriptionRepository::new();
        expect_user(&mut user_repo, user_id);
        subscription_repo
            .expect_find_active_by_user_and_product()
            .returning(|_, _| Box::pin(async { Ok(None) }));
        subscription_repo.expect_create().times(0);
        let product = sample_product(product_id, plan_id, "115.00.", "10.00");
        product_repo.expect_find_by_id().returning(move |_| {
            let product = product.clone();
            Box::pin(async move { Ok(Some(product)) })
        });
        let voucher_store = store_with("FIVE", VoucherType::FixedAmount, "5", true).await;

        let err = use_case(user_repo, product_repo, subscription_repo, voucher_store)
            .subscribe(user_id, product_id, plan_id, Some("FIVE".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, UseCaseError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn storage_failure_is_internal() {
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Err(anyhow!("connection refused")) }));

        let err = use_case(
            MockUserRepository::new(),
            MockProductRepository::new(),
            subscription_repo,
            InMemoryVoucherStore::new(),
        )
        .fetch(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();

        assert!(matches!(err, UseCaseError::Internal(_)));
    }

    #[tokio::test]
    async fn subscription_of_another_user_is_not_found() {
        let subscription = sample_subscription(Uuid::new_v4(), 5);
        let mut subscription_repo = MockSubscriptionRepository::new();
        expect_subscription(&mut subscription_repo, &subscription);
        subscription_repo.expect_update_fields().times(0);

        let use_case = use_case(
            MockUserRepository::new(),
            MockProductRepository::new(),
            subscription_repo,
            InMemoryVoucherStore::new(),
        );
        let stranger = Uuid::new_v4();

        let err = use_case.fetch(stranger, subscription.id).await.unwrap_err();
        assert!(matches!(err, UseCaseError::DataNotFound("subscription")));
        let err = use_case
            .unsubscribe(stranger, subscription.id)
            .await
            .unwrap_err();
        assert!(matches!(err, UseCaseError::DataNotFound("subscription")));
    }

    #[tokio::test]
    async fn pause_during_trial_is_forbidden() {
        let user_id = Uuid::new_v4();
        let subscription = sample_subscription(user_id, -3);
        let mut subscription_repo = MockSubscriptionRepository::new();
        expect_subscription(&mut subscription_repo, &subscription);
        subscription_repo.expect_update_fields().times(0);

        let err = use_case(
            MockUserRepository::new(),
            MockProductRepository::new(),
            subscription_repo,
            InMemoryVoucherStore::new(),
        )
        .pause(user_id, subscription.id)
        .await
        .unwrap_err();

        assert!(matches!(err, UseCaseError::Forbidden(_)));
    }

    #[tokio::test]
    async fn pause_after_trial_clears_end_date() {
        let user_id = Uuid::new_v4();
        let subscription = sample_subscription(user_id, 3);
        let captured = Arc::new(Mutex::new(None));
        let mut subscription_repo = MockSubscriptionRepository::new();
        expect_subscription(&mut subscription_repo, &subscription);
        expect_update(&mut subscription_repo, &subscription, Arc::clone(&captured));

        let paused = use_case(
            MockUserRepository::new(),
            MockProductRepository::new(),
            subscription_repo,
            InMemoryVoucherStore::new(),
        )
        .pause(user_id, subscription.id)
        .await
        .unwrap();

        assert!(paused.is_paused);
        assert_eq!(paused.end_date, None);
        assert!(paused.pause_date.is_some());
        assert_eq!(paused.state, SubscriptionState::Paused);

        let update = captured.lock().unwrap().clone().unwrap();
        assert_eq!(update.is_active, None);
        assert_eq!(update.end_date, Some(None));
    }

    #[tokio::test]
    async fn pausing_twice_is_a_no_op() {
        let user_id = Uuid::new_v4();
        let mut subscription = sample_subscription(user_id, 3);
        UpdateSubscriptionEntity::pause(Utc::now()).apply_to(&mut subscription);
        let mut subscription_repo = MockSubscriptionRepository::new();
        expect_subscription(&mut subscription_repo, &subscription);
        subscription_repo.expect_update_fields().times(0);

        let paused = use_case(
            MockUserRepository::new(),
            MockProductRepository::new(),
            subscription_repo,
            InMemoryVoucherStore::new(),
        )
        .pause(user_id, subscription.id)
        .await
        .unwrap();

        assert_eq!(paused, SubscriptionDto::from(subscription));
    }

    #[tokio::test]
    async fn resume_preserves_remaining_term() {
        let user_id = Uuid::new_v4();
        let mut subscription = sample_subscription(user_id, 60);
        subscription.plan.length_months = 1;
        subscription.start_date = Utc::now() - Duration::days(25);
        subscription.trial_date = subscription.start_date - Duration::hours(1);
        // Planned end is ten days after the pause.
        let pause_date = subscription
            .start_date
            .checked_add_months(Months::new(1))
            .unwrap()
            - Duration::days(10);
        subscription.is_paused = true;
        subscription.end_date = None;
        subscription.pause_date = Some(pause_date);

        let captured = Arc::new(Mutex::new(None));
        let mut subscription_repo = MockSubscriptionRepository::new();
        expect_subscription(&mut subscription_repo, &subscription);
        expect_update(&mut subscription_repo, &subscription, Arc::clone(&captured));

        let resumed = use_case(
            MockUserRepository::new(),
            MockProductRepository::new(),
            subscription_repo,
            InMemoryVoucherStore::new(),
        )
        .resume(user_id, subscription.id)
        .await
        .unwrap();

        let end_date: DateTime<Utc> = resumed.end_date.unwrap();
        let expected = Utc::now() + Duration::days(10);
        assert!((expected - end_date).num_seconds().abs() < 5);
        assert!(!resumed.is_paused);
        assert_eq!(resumed.pause_date, None);
        assert_eq!(resumed.state, SubscriptionState::Active);
    }

    #[tokio::test]
    async fn resume_of_unpaused_subscription_is_a_no_op() {
        let user_id = Uuid::new_v4();
        let subscription = sample_subscription(user_id, 3);
        let mut subscription_repo = MockSubscriptionRepository::new();
        expect_subscription(&mut subscription_repo, &subscription);
        subscription_repo.expect_update_fields().times(0);

        let resumed = use_case(
            MockUserRepository::new(),
            MockProductRepository::new(),
            subscription_repo,
            InMemoryVoucherStore::new(),
        )
        .resume(user_id, subscription.id)
        .await
        .unwrap();

        assert_eq!(resumed.end_date, subscription.end_date);
    }

    #[tokio::test]
    async fn unsubscribed_subscription_is_terminal() {
        let user_id = Uuid::new_v4();
        let mut subscription = sample_subscription(user_id, 3);
        subscription.is_active = false;
        let mut subscription_repo = MockSubscriptionRepository::new();
        expect_subscription(&mut subscription_repo, &subscription);
        subscription_repo.expect_update_fields().times(0);

        let use_case = use_case(
            MockUserRepository::new(),
            MockProductRepository::new(),
            subscription_repo,
            InMemoryVoucherStore::new(),
        );

        let again = use_case.unsubscribe(user_id, subscription.id).await.unwrap();
        assert!(!again.is_active);
        assert_eq!(again.state, SubscriptionState::Inactive);

        let err = use_case.pause(user_id, subscription.id).await.unwrap_err();
        assert!(matches!(err, UseCaseError::Forbidden(_)));
        let err = use_case.resume(user_id, subscription.id).await.unwrap_err();
        assert!(matches!(err, UseCaseError::Forbidden(_)));
    }

    #[tokio::test]
    async fn unsubscribe_deactivates_without_touching_dates() {
        let user_id = Uuid::new_v4();
        let subscription = sample_subscription(user_id, -3);
        let captured = Arc::new(Mutex::new(None));
        let mut subscription_repo = MockSubscriptionRepository::new();
        expect_subscription(&mut subscription_repo, &subscription);
        expect_update(&mut subscription_repo, &subscription, Arc::clone(&captured));

        let unsubscribed = use_case(
            MockUserRepository::new(),
            MockProductRepository::new(),
            subscription_repo,
            InMemoryVoucherStore::new(),
        )
        .apply_action(user_id, subscription.id, SubscriptionAction::Unsubscribe)
        .await
        .unwrap();

        assert!(!unsubscribed.is_active);
        assert_eq!(unsubscribed.end_date, subscription.end_date);
        let update = captured.lock().unwrap().clone().unwrap();
        assert_eq!(update.end_date, None);
        assert_eq!(update.is_active, Some(false));
    }

    #[tokio::test]
    async fn list_requires_a_known_user() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_id()
            .returning(|_| Box::pin(async { Ok(None) }));
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo.expect_list_by_user().times(0);

        let err = use_case(
            user_repo,
            MockProductRepository::new(),
            subscription_repo,
            InMemoryVoucherStore::new(),
        )
        .list(Uuid::new_v4())
        .await
        .unwrap_err();

        assert!(matches!(err, UseCaseError::DataNotFound("user")));
    }

    #[tokio::test]
    async fn list_of_user_without_subscriptions_is_empty() {
        let user_id = Uuid::new_v4();
        let mut user_repo = MockUserRepository::new();
        expect_user(&mut user_repo, user_id);
        let mut subscription_repo = MockSubscriptionRepository::new();
        subscription_repo
            .expect_list_by_user()
            .with(eq(user_id))
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));

        let subscriptions = use_case(
            user_repo,
            MockProductRepository::new(),
            subscription_repo,
            InMemoryVoucherStore::new(),
        )
        .list(user_id)
        .await
        .unwrap();

        assert!(subscriptions.is_empty());
    }
}
