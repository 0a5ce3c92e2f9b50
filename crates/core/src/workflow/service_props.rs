//! Property-based tests for the transfer and loan state machines.

use assetra_shared::types::{AssetId, UnitId, UserId};
use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::asset::{Asset, AssetStatus, Unit};
use crate::error::EngineError;
use crate::storage::{CheckedPhoto, PhotoRef};
use crate::workflow::loan::{LoanService, REASON_MAX_CHARS, REASON_MIN_CHARS};
use crate::workflow::transfer::TransferService;
use crate::workflow::types::RequestStatus;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
}

fn today() -> NaiveDate {
    now().date_naive()
}

fn arb_status() -> impl Strategy<Value = AssetStatus> {
    prop::sample::select(AssetStatus::ALL.to_vec())
}

fn asset(unit: Option<i64>, status: AssetStatus) -> Asset {
    Asset {
        id: AssetId::new(),
        tag: "AST-202401-000001".to_string(),
        name: "Desk".to_string(),
        category: "Furniture".to_string(),
        unit_id: unit.map(UnitId),
        value: Decimal::from(2_500_000),
        purchase_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
        useful_life_years: 8,
        status,
        created_at: now(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Once resolved, a movement rejects every further decision.
    #[test]
    fn prop_transfer_resolves_once(approve_first in any::<bool>(), approve_second in any::<bool>()) {
        let target = Unit { id: UnitId(2), code: "B".into(), name: "B".into(), active: true };
        let mut movement = TransferService::open(
            &asset(Some(1), AssetStatus::InUse), &target, false, None, UserId::new(), now(),
        ).unwrap();

        let first = if approve_first {
            TransferService::approve(&movement, UserId::new(), now())
        } else {
            TransferService::reject(&movement, UserId::new(), now(), "Budget".into())
        }.unwrap();
        movement.apply(&first);
        prop_assert!(movement.status.is_terminal());

        let second = if approve_second {
            TransferService::approve(&movement, UserId::new(), now())
        } else {
            TransferService::reject(&movement, UserId::new(), now(), "Budget".into())
        };
        let already_resolved = matches!(second, Err(EngineError::AlreadyResolved { .. }));
        prop_assert!(already_resolved, "second decision was accepted: {:?}", second);
    }

    /// A transfer can target any active unit other than the current one.
    #[test]
    fn prop_transfer_target_rules(current in 1i64..6, target in 1i64..6, active in any::<bool>()) {
        let unit = Unit { id: UnitId(target), code: "U".into(), name: "U".into(), active };
        let result = TransferService::open(
            &asset(Some(current), AssetStatus::Idle), &unit, false, None, UserId::new(), now(),
        );
        if current == target || !active {
            prop_assert!(matches!(result, Err(EngineError::Validation(_))));
        } else {
            let movement = result.unwrap();
            prop_assert_eq!(movement.status, RequestStatus::Pending);
            prop_assert_eq!(movement.from_unit, Some(UnitId(current)));
        }
    }

    /// Loans can be opened exactly from loanable statuses.
    #[test]
    fn prop_loan_open_follows_loanable_set(status in arb_status()) {
        let result = LoanService::open(
            &asset(None, status), UserId::new(), today(), "Field work", UserId::new(), now(),
        );
        prop_assert_eq!(result.is_ok(), status.is_loanable());
    }

    /// Approval succeeds for any past-or-present date and fails for any future one.
    #[test]
    fn prop_loan_approval_date_boundary(offset in -400i64..400) {
        let loan = LoanService::open(
            &asset(None, AssetStatus::InUse), UserId::new(), today(), "Field work", UserId::new(), now(),
        ).unwrap();
        let date = if offset >= 0 {
            today() - Days::new(offset.unsigned_abs())
        } else {
            today() + Days::new(offset.unsigned_abs())
        };
        let proof = Some(CheckedPhoto { photo: PhotoRef("photos/p/p.jpg".into()), stored: true });
        let result = LoanService::approve(&loan, AssetStatus::InUse, UserId::new(), date, proof, today());
        prop_assert_eq!(result.is_ok(), offset >= 0);
    }

    /// Rejection accepts exactly the reasons whose trimmed length is in range.
    #[test]
    fn prop_loan_reason_length(len in 0usize..600, pad in 0usize..5) {
        let loan = LoanService::open(
            &asset(None, AssetStatus::Idle), UserId::new(), today(), "Field work", UserId::new(), now(),
        ).unwrap();
        let reason = format!("{}{}{}", " ".repeat(pad), "r".repeat(len), " ".repeat(pad));
        let result = LoanService::reject(&loan, UserId::new(), today(), reason, today());
        prop_assert_eq!(result.is_ok(), (REASON_MIN_CHARS..=REASON_MAX_CHARS).contains(&len));
    }
}
