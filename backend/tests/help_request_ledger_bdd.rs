//! Behaviour tests for the request-assignment ledger.
//!
//! Scenarios drive [`HelpRequestLedger`] directly over the in-memory store so
//! they exercise the counter bookkeeping without the HTTP layer.

use std::cell::RefCell;
use std::sync::Arc;

use ayuda::domain::ports::{HelpRequestCommand, HelpRequestQuery};
use ayuda::domain::{
    Assignment, AssignmentState, Error, ErrorCode, HelpRequest, HelpRequestKind,
    HelpRequestLedger, NewAssignment, NewHelpRequest, UserId,
};
use ayuda::outbound::memory::InMemoryStore;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

type Ledger = HelpRequestLedger<InMemoryStore, InMemoryStore>;

struct LedgerWorld {
    runtime: Runtime,
    ledger: Ledger,
    need: RefCell<Option<HelpRequest>>,
    helper: UserId,
    assignment: RefCell<Option<Assignment>>,
    last_error: RefCell<Option<Error>>,
}

impl LedgerWorld {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        Self {
            runtime: tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("runtime"),
            ledger: HelpRequestLedger::new(store.clone(), store),
            need: RefCell::new(None),
            helper: UserId::random(),
            assignment: RefCell::new(None),
            last_error: RefCell::new(None),
        }
    }

    fn need(&self) -> HelpRequest {
        self.need.borrow().clone().expect("need posted")
    }

    fn refreshed_need(&self) -> HelpRequest {
        let id = self.need().id;
        self.runtime
            .block_on(self.ledger.get_one(id))
            .expect("need exists")
    }

    fn assign(&self, user_id: UserId) -> Result<Assignment, Error> {
        let input = NewAssignment::new(self.need().id, user_id, None);
        self.runtime.block_on(self.ledger.assign(input))
    }
}

#[fixture]
fn world() -> LedgerWorld {
    LedgerWorld::new()
}

#[given("a need posted by a resident")]
fn a_need_posted_by_a_resident(world: &LedgerWorld) {
    let draft = NewHelpRequest::new(
        HelpRequestKind::Necesita,
        UserId::random(),
        "Catarroja, Camí Reial 40",
        "600 123 456",
    );
    let created = world
        .runtime
        .block_on(world.ledger.create_request(draft))
        .expect("need created");
    *world.need.borrow_mut() = Some(created);
}

#[given("a helper assigned to the need")]
fn a_helper_assigned_to_the_need(world: &LedgerWorld) {
    let assignment = world.assign(world.helper.clone()).expect("assigned");
    *world.assignment.borrow_mut() = Some(assignment);
}

#[when("two different helpers assign themselves")]
fn two_different_helpers_assign_themselves(world: &LedgerWorld) {
    let id = world.need().id;
    let first = NewAssignment::new(id, UserId::random(), None);
    let second = NewAssignment::new(id, UserId::random(), Some("611 000 111".to_owned()));
    let (a, b) = world.runtime.block_on(async {
        tokio::join!(world.ledger.assign(first), world.ledger.assign(second))
    });
    a.expect("first assignment");
    b.expect("second assignment");
}

#[when("the same helper assigns again")]
fn the_same_helper_assigns_again(world: &LedgerWorld) {
    let outcome = world.assign(world.helper.clone());
    *world.last_error.borrow_mut() = outcome.err();
}

#[when("the helper unassigns")]
fn the_helper_unassigns(world: &LedgerWorld) {
    let assignment = world.assignment.borrow().clone().expect("assignment");
    world
        .runtime
        .block_on(world.ledger.unassign(assignment.id))
        .expect("unassigned");
}

#[then("the need has {count} assignees")]
fn the_need_has_assignees(world: &LedgerWorld, count: u32) {
    assert_eq!(world.refreshed_need().asignees_count, count);
}

#[then("the need lists {count} assignments")]
fn the_need_lists_assignments(world: &LedgerWorld, count: usize) {
    let id = world.need().id;
    let assignments = world
        .runtime
        .block_on(world.ledger.assignments(id))
        .expect("assignments");
    assert_eq!(assignments.len(), count);
}

#[then("the assignment is rejected as a conflict")]
fn the_assignment_is_rejected_as_a_conflict(world: &LedgerWorld) {
    let error = world.last_error.borrow().clone().expect("assignment error");
    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[then("the need is open")]
fn the_need_is_open(world: &LedgerWorld) {
    assert_eq!(world.refreshed_need().assignment_state(), AssignmentState::Open);
}

#[scenario(
    path = "tests/features/help_request_ledger.feature",
    name = "Two helpers claim the same need"
)]
fn two_helpers_claim_the_same_need(world: LedgerWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/help_request_ledger.feature",
    name = "A helper cannot claim a need twice"
)]
fn a_helper_cannot_claim_a_need_twice(world: LedgerWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/help_request_ledger.feature",
    name = "Unassigning releases the need"
)]
fn unassigning_releases_the_need(world: LedgerWorld) {
    drop(world);
}
