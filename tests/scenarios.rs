//! End-to-end scenarios against the public API.

use multistate::{
    ActionError, BoxError, CompileError, DeclarationError, Entity, Expr, MemoryEntity, Multistate,
    QueryError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const SEQUENCE: [&str; 5] = ["sign_a", "sign_c", "sign_d", "sign_e", "sign_f"];

/// Six signatures; `resets` decides whether later signatures clear earlier
/// ones.
fn signatures(resets: bool) -> Multistate<MemoryEntity> {
    let mut ms = Multistate::new("Unsigned");
    let mut flag = |bit: u8, x: &str| {
        ms.must_add_state(bit, &format!("signed_{x}"), &format!("Signed by {x}"))
    };
    let (a, b, c, d, e, f) = (
        flag(0, "a"),
        flag(1, "b"),
        flag(2, "c"),
        flag(3, "d"),
        flag(4, "e"),
        flag(5, "f"),
    );
    let pick = |ids: &'static [&'static str]| -> &'static [&'static str] {
        if resets {
            ids
        } else {
            &[]
        }
    };

    ms.must_add_action("sign_a", "Sign A", Expr::empty(), &[a.id()], &[], None, None);
    ms.must_add_action("sign_b", "Sign B", Expr::empty(), &[b.id()], &[], None, None);
    ms.must_add_action(
        "sign_c",
        "Sign C",
        Expr::and([Expr::or([Expr::from(&a), Expr::from(&b)]), !Expr::from(&c)]),
        &[c.id()],
        pick(&["signed_a", "signed_b"]),
        None,
        None,
    );
    ms.must_add_action(
        "sign_d",
        "Sign D",
        Expr::and([Expr::or([Expr::from(&c), Expr::from(&e)]), !Expr::from(&d)]),
        &[d.id()],
        pick(&["signed_c"]),
        None,
        None,
    );
    ms.must_add_action(
        "sign_e",
        "Sign E",
        Expr::and([Expr::or([Expr::from(&c), Expr::from(&d)]), !Expr::from(&e)]),
        &[e.id()],
        pick(&["signed_c"]),
        None,
        None,
    );
    ms.must_add_action(
        "sign_f",
        "Sign F",
        Expr::and([Expr::from(&d), Expr::from(&e), !Expr::from(&f)]),
        &[f.id()],
        pick(&["signed_d", "signed_e"]),
        None,
        None,
    );
    ms.must_compile();
    ms
}

async fn run_sequence(ms: &Multistate<MemoryEntity>, entity: &MemoryEntity) -> u64 {
    let mut last = 0;
    for action in SEQUENCE {
        last = ms.do_action(&(), entity, action, &[]).await.unwrap();
    }
    last
}

#[tokio::test]
async fn accumulating_signatures() {
    let ms = signatures(false);
    let entity = MemoryEntity::new();

    assert_eq!(run_sequence(&ms, &entity).await, 61);
    assert_eq!(entity.state(), 0b111101);
    assert_eq!(entity.history().get_path(), vec![0, 1, 5, 13, 29, 61]);
}

#[tokio::test]
async fn superseding_signatures() {
    let ms = signatures(true);
    let entity = MemoryEntity::new();

    assert_eq!(run_sequence(&ms, &entity).await, 32);
    assert_eq!(entity.history().get_path(), vec![0, 1, 4, 8, 24, 32]);
}

#[test]
fn required_and_forbidden_over_partial_graph() {
    let mut ms = Multistate::<MemoryEntity>::new("Unsigned");
    for (bit, id) in ["a", "b", "c", "d", "e"].into_iter().enumerate() {
        ms.must_add_state(bit as u8, id, &id.to_uppercase());
    }
    let has = |bit| Expr::bit(bit);

    ms.must_add_action("sign_a", "Sign A", Expr::empty(), &["a"], &[], None, None);
    ms.must_add_action("sign_b", "Sign B", Expr::empty(), &["b"], &[], None, None);
    ms.must_add_action(
        "sign_c",
        "Sign C",
        Expr::and([Expr::or([has(0), has(1)]), !has(2)]),
        &["c"],
        &[],
        None,
        None,
    );
    ms.must_add_action(
        "sign_d",
        "Sign D",
        Expr::and([Expr::or([has(2), has(4)]), !has(3)]),
        &["d"],
        &[],
        None,
        None,
    );
    ms.must_add_action(
        "sign_e",
        "Sign E",
        Expr::and([Expr::or([has(2), has(3)]), !has(4)]),
        &["e"],
        &["c"],
        None,
        None,
    );
    ms.must_compile();

    assert_eq!(
        ms.multistates_by_required_and_forbidden(&["a", "c"], &["d"]),
        Ok(vec![5, 21])
    );
    assert_eq!(
        ms.multistates_by_required_and_forbidden(&["a", "zzz"], &[]),
        Err(QueryError::InvalidState {
            id: "zzz".to_string()
        })
    );
}

#[test]
fn every_reachable_combination_has_a_path_from_empty() {
    let ms = signatures(false);
    let graph = ms.graph().unwrap();

    let mut seen = vec![0u64];
    let mut i = 0;
    while i < seen.len() {
        for &to in graph.transitions(seen[i]).unwrap().values() {
            if !seen.contains(&to) {
                seen.push(to);
            }
        }
        i += 1;
    }
    seen.sort_unstable();

    assert_eq!(seen, ms.combinations().collect::<Vec<_>>());
}

#[test]
fn invalid_declarations() {
    let mut ms = Multistate::<MemoryEntity>::new("New");

    assert!(matches!(
        ms.add_state(0, "Bad Id", "Bad"),
        Err(DeclarationError::InvalidIdentifier { .. })
    ));
    assert!(matches!(
        ms.add_state(0, "any", "Any"),
        Err(DeclarationError::InvalidIdentifier { .. })
    ));
    assert!(matches!(
        ms.add_action("go", "Go", Expr::any(), &["nope"], &[], None, None),
        Err(DeclarationError::UnknownState { .. })
    ));
}

#[test]
fn compile_is_one_shot() {
    let mut ms = signatures(false);

    assert!(matches!(ms.compile(), Err(CompileError::AlreadyCompiled)));
}

/// Entity that counts `end_action` calls and always swallows errors.
#[derive(Clone, Default)]
struct Forgiving {
    ends: Arc<AtomicUsize>,
    errors: Arc<Mutex<Vec<String>>>,
}

impl Entity for Forgiving {
    type Context = u64;

    async fn start_action(&self, ctx: &u64) -> Result<u64, BoxError> {
        Ok(*ctx)
    }

    async fn get_state(&self, ctx: &u64) -> Result<u64, BoxError> {
        Ok(*ctx)
    }

    async fn set_state(&self, _ctx: &u64, _state: u64, _opts: &[serde_json::Value]) -> Result<(), BoxError> {
        Ok(())
    }

    async fn end_action(&self, _ctx: u64, error: Option<ActionError>) -> Result<(), ActionError> {
        self.ends.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = error {
            self.errors.lock().unwrap().push(error.to_string());
        }
        Ok(())
    }
}

#[tokio::test]
async fn end_action_sees_every_outcome() {
    let mut ms = Multistate::<Forgiving>::new("New");
    ms.must_add_state(0, "a", "A");
    ms.must_add_action("set_a", "Set A", Expr::empty(), &["a"], &[], None, None);
    ms.must_compile();
    let entity = Forgiving::default();

    assert_eq!(ms.do_action(&0, &entity, "set_a", &[]).await.unwrap(), 1);
    assert_eq!(ms.do_action(&1, &entity, "set_a", &[]).await.unwrap(), 1);
    assert_eq!(ms.do_action(&7, &entity, "set_a", &[]).await.unwrap(), 7);

    assert_eq!(entity.ends.load(Ordering::SeqCst), 3);
    assert_eq!(
        *entity.errors.lock().unwrap(),
        vec![
            "action 'set_a', current state 1: invalid action".to_string(),
            "current state 7: invalid state".to_string(),
        ]
    );
}

#[tokio::test]
async fn concurrent_actions_on_separate_entities() {
    let ms = Arc::new(signatures(false));
    let first = MemoryEntity::new();
    let second = MemoryEntity::new();

    let (a, b) = tokio::join!(
        ms.do_action(&(), &first, "sign_a", &[]),
        ms.do_action(&(), &second, "sign_b", &[]),
    );

    assert_eq!(a.unwrap(), 1);
    assert_eq!(b.unwrap(), 2);
}
