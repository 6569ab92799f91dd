//! Document Signing Workflow
//!
//! This example demonstrates a document that needs two independent
//! signatures before it can be sent.
//!
//! Key concepts:
//! - Independent flags (signatures can happen in any order)
//! - Guards over flag combinations (send needs both signatures)
//! - Availability gates (only managers may send)
//! - A registry-wide audit callback plus a per-action callback
//! - Declarative construction with a `Schema`
//!
//! Run with: cargo run --example document_signing

use multistate::effects::OnActionCallback;
use multistate::{
    ActionBuilder, ActionEvent, BoxError, ClusterDecl, Expr, Gate, MemoryEntity, Multistate,
    MultistateConfig, Schema, StateDecl,
};
use std::sync::Arc;
use stillwater::prelude::*;

struct Contract;

impl Schema<MemoryEntity> for Contract {
    fn config(&self) -> MultistateConfig {
        MultistateConfig::default().with_empty_state_name("Blank")
    }

    fn states(&self) -> Vec<StateDecl> {
        vec![
            StateDecl::new(0, "drafted", "Drafted"),
            StateDecl::new(1, "signed_by_author", "Signed by author"),
            StateDecl::new(2, "signed_by_reviewer", "Signed by reviewer"),
            StateDecl::new(3, "sent", "Sent"),
        ]
    }

    fn actions(&self) -> Vec<ActionBuilder<MemoryEntity>> {
        let drafted = Expr::bit(0);
        let author = Expr::bit(1);
        let reviewer = Expr::bit(2);
        let sent = Expr::bit(3);

        vec![
            ActionBuilder::new("draft").caption("Draft").set(["drafted"]),
            ActionBuilder::new("sign_author")
                .caption("Sign as author")
                .from(Expr::and([drafted.clone(), !author.clone(), !sent.clone()]))
                .set(["signed_by_author"]),
            ActionBuilder::new("sign_reviewer")
                .caption("Sign as reviewer")
                .from(Expr::and([drafted.clone(), !reviewer.clone(), !sent.clone()]))
                .set(["signed_by_reviewer"]),
            ActionBuilder::new("send")
                .caption("Send")
                .from(Expr::and([author, reviewer, !sent]))
                .set(["sent"])
                .reset(["drafted"])
                .available_when(Gate::new("manager only", |_: &()| true))
                .on_do(|_, opts| {
                    let recipients = opts.len();
                    from_fn(move |_: &MemoryEntity| {
                        if recipients == 0 {
                            Err(BoxError::from("no recipients"))
                        } else {
                            println!("  [Mail] sending to {recipients} recipient(s)");
                            Ok(())
                        }
                    })
                    .boxed()
                }),
        ]
    }

    fn clusters(&self) -> Vec<ClusterDecl> {
        vec![
            ClusterDecl::new("In progress", Expr::and([Expr::bit(0), !Expr::bit(3)])),
            ClusterDecl::new("Done", Expr::bit(3)),
        ]
    }

    fn on_action(&self) -> Option<OnActionCallback<MemoryEntity>> {
        Some(Arc::new(|event: &ActionEvent<'_, ()>| {
            println!(
                "  [Audit] {}: {} -> {}",
                event.action, event.previous, event.next
            );
            pure(()).boxed()
        }))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Document Signing Workflow ===\n");

    let ms = Multistate::<MemoryEntity>::from_schema(&Contract)?;
    let entity = MemoryEntity::new();

    println!("Reachable combinations:");
    for combination in ms.combinations() {
        let cluster = ms.cluster_of(combination).map_or("-", |c| c.name());
        println!(
            "  {combination:>2} [{cluster}] {}",
            ms.state_name(combination).replace('\n', " ")
        );
    }

    println!("\nExecuting actions:");
    for action in ["draft", "sign_reviewer", "sign_author"] {
        let now = ms.do_action(&(), &entity, action, &[]).await?;
        println!("  {action} -> {now}, next: {:?}", ms.state_actions(&(), now));
    }

    println!("\nSending without recipients:");
    match ms.do_action(&(), &entity, "send", &[]).await {
        Ok(now) => println!("  unexpected success: {now}"),
        Err(err) => println!("  rejected: {err}"),
    }

    println!("\nSending:");
    let recipients = [serde_json::json!("legal@example.com")];
    let now = ms.do_action(&(), &entity, "send", &recipients).await?;
    println!("  final state: {}", ms.state_name(now).replace('\n', " "));

    println!("\nHistory: {:?}", entity.history().get_path());

    println!("\nGraphviz source:\n{}", ms.snapshot()?.to_dot());

    Ok(())
}
