mod support;

use outreach_aws::handlers::intake::{submit_customer, SubmissionOutcome};
use outreach_core::record::CustomerRecord;

use support::{InMemoryTable, ScriptedOperator};

#[test]
fn unique_submission_creates_exactly_one_matching_entry() {
    let table = InMemoryTable::new();
    let record = CustomerRecord::new("x1", "Jane", "Doe", "skiing,hiking", 29);
    let mut operator = ScriptedOperator::new(vec![record.clone()]);

    let outcome = submit_customer(&mut operator, &table, 5).expect("submission should succeed");

    assert!(matches!(outcome, SubmissionOutcome::Inserted { attempts: 1, .. }));
    assert_eq!(table.len(), 1);
    assert_eq!(table.item("x1"), Some(record.to_item()));
    assert_eq!(table.lookups(), 1);
    assert_eq!(table.writes(), 1);
}

#[test]
fn resubmitting_same_id_is_rejected_and_reprompted() {
    let table = InMemoryTable::new();
    let original = CustomerRecord::new("x1", "Jane", "Doe", "skiing", 29);
    let repeat = CustomerRecord::new("x1", "Janet", "Dough", "golf", 41);
    let fresh = CustomerRecord::new("x2", "Janet", "Dough", "golf", 41);

    let mut first_run = ScriptedOperator::new(vec![original.clone()]);
    submit_customer(&mut first_run, &table, 5).expect("first submission should succeed");

    let mut second_run = ScriptedOperator::new(vec![repeat, fresh.clone()]);
    let outcome = submit_customer(&mut second_run, &table, 5).expect("second run should succeed");

    assert_eq!(
        outcome,
        SubmissionOutcome::Inserted {
            customer_id: "x2".to_string(),
            attempts: 2,
        }
    );
    assert_eq!(second_run.rejected, vec!["x1".to_string()]);
    assert_eq!(table.item("x1"), Some(original.to_item()));
    assert_eq!(table.item("x2"), Some(fresh.to_item()));
    assert_eq!(table.writes(), 2);
}

#[test]
fn repeated_collisions_end_in_abandoned_without_writing() {
    let table = InMemoryTable::new();
    table.seed(&CustomerRecord::new("x1", "Jane", "Doe", "skiing", 29));
    let collisions = (0..3)
        .map(|_| CustomerRecord::new("x1", "Other", "Person", "chess", 60))
        .collect();
    let mut operator = ScriptedOperator::new(collisions);

    let outcome = submit_customer(&mut operator, &table, 3).expect("run should finish");

    assert_eq!(outcome, SubmissionOutcome::Abandoned { attempts: 3 });
    assert_eq!(operator.remaining(), 0);
    assert_eq!(table.writes(), 0);
    assert_eq!(table.len(), 1);
}
