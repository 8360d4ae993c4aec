//! Row Filters - Tenant Isolation Example
//!
//! This example shows how a query gateway can constrain every statement a
//! user submits to the rows they are allowed to see:
//! - A policy maps tables to filter conditions
//! - Each policy is applied in turn to the incoming statement
//! - Statements that never read a protected table pass through untouched
//!
//! Run with: cargo run --example row_filters

use oxide_rewrite::{RewriteOptions, RewriteResult, Rewriter};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// A filter applied to every block reading from `table`.
struct Policy {
    table: &'static str,
    condition: &'static str,
}

const POLICIES: &[Policy] = &[
    Policy {
        table: "sales.orders",
        condition: "tenant_id = 42",
    },
    Policy {
        table: "users",
        condition: "u.deleted_at IS NULL",
    },
];

const QUERIES: &[&str] = &[
    "SELECT customer_id, SUM(amount) AS total
FROM sales.orders
WHERE order_date >= DATE_SUB(CURRENT_DATE(), INTERVAL 7 DAY)
  AND status IN ('paid', 'shipped')
GROUP BY customer_id
ORDER BY total DESC
LIMIT 100",
    "SELECT u.name, o.amount -- per user
FROM users u
JOIN sales.orders o ON u.id = o.user_id;",
    "WITH recent AS (SELECT * FROM sales.orders WHERE amount > 10)
SELECT COUNT(*) FROM recent",
    "SELECT 1",
];

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .without_time()
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Logging already initialised");
    }

    let rewriter = Rewriter::with_options(RewriteOptions::new().with_condition_validation());

    for query in QUERIES {
        println!("--- Input ---\n{query}\n");

        let mut sql = (*query).to_string();
        for policy in POLICIES {
            match rewriter.rewrite(&sql, policy.condition, Some(policy.table)) {
                Ok(RewriteResult::Rewritten { sql: rewritten, clauses }) => {
                    println!("[{}] constrained {clauses} block(s)", policy.table);
                    sql = rewritten;
                }
                Ok(RewriteResult::Unchanged) => {
                    println!("[{}] not referenced", policy.table);
                }
                Err(err) => {
                    println!("[{}] rejected: {err}", policy.table);
                    break;
                }
            }
        }

        println!("\n--- Output ---\n{sql}\n");
    }
}
