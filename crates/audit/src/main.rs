//! Prints the compiled-in authorization model, or explains one decision.
//!
//! ```text
//! dealerhub-audit
//! dealerhub-audit explain <role> <permission | route:/path | feature:NAME>
//! ```

use anyhow::{Context, bail};

use dealerhub_auth::{Permission, Principal, RbacRegistry, Requirement, Role, default_model, explain};

const USAGE: &str = "usage: dealerhub-audit [explain <role> <permission | route:/path | feature:NAME>]";

fn requirement_from_arg(query: &str) -> Requirement {
    if let Some(path) = query.strip_prefix("route:") {
        Requirement::route(path)
    } else if let Some(feature) = query.strip_prefix("feature:") {
        Requirement::feature(feature)
    } else {
        Requirement::Permission(Permission::new(query.to_string()))
    }
}

fn main() -> anyhow::Result<()> {
    dealerhub_observability::init_with_default("warn");

    let model = default_model().context("built-in authorization model is invalid")?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    let output = match args.as_slice() {
        [] => serde_json::to_string_pretty(&RbacRegistry::from_model(&model))?,
        [command, role, query] if command == "explain" => {
            let role: Role = role.parse().with_context(|| format!("invalid role `{role}`"))?;
            let requirement = requirement_from_arg(query);
            tracing::debug!(%role, %requirement, "explaining decision");
            serde_json::to_string_pretty(&explain(&model, &Principal::from_role(role), &requirement))?
        }
        _ => bail!(USAGE),
    };

    println!("{output}");
    Ok(())
}
