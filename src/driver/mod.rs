//! Traffic Driver - randomized call cycles against the orders API
//! Each cycle exercises every operation, including one guaranteed miss so
//! the not-found path shows up in traces. Interrupts are honored only at
//! cycle boundaries; a cycle in flight always finishes.

use std::io::{self, Write};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

/// Item vocabulary for generated orders
pub const ITEMS: &[&str] = &[
    "widget",
    "gadget",
    "sprocket",
    "gizmo",
    "thingamajig",
    "doohickey",
];

/// Identifier guaranteed to miss, exercised once per cycle
pub const INVALID_ORDER_ID: &str = "bad-id";

#[derive(Error, Debug)]
pub enum DriverError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub base_url: String,
    /// Cycles to run; None means loop until cancelled
    pub count: Option<u64>,
    pub interval: Duration,
    pub verbose: bool,
}

// =====================================================
// API CLIENT
// =====================================================

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, DriverError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// POST /orders; returns the new order id, or None when the API rejected it
    pub async fn create_order(
        &self,
        item: &str,
        quantity: i64,
    ) -> Result<Option<String>, DriverError> {
        let resp = self
            .http
            .post(format!("{}/orders", self.base_url))
            .json(&serde_json::json!({ "item": item, "quantity": quantity }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Ok(None);
        }
        let body: serde_json::Value = resp.json().await?;
        Ok(body.get("id").and_then(|v| v.as_str()).map(str::to_string))
    }

    /// GET /orders with the server-side default limit
    pub async fn list_orders(&self) -> Result<(), DriverError> {
        self.http
            .get(format!("{}/orders", self.base_url))
            .send()
            .await?;
        Ok(())
    }

    /// GET /orders/{id}; Ok(true) when the order exists
    pub async fn get_order(&self, id: &str) -> Result<bool, DriverError> {
        let resp = self
            .http
            .get(format!("{}/orders/{}", self.base_url, id))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }

    /// POST /orders/{id}/complete; Ok(true) when the order exists
    pub async fn complete_order(&self, id: &str) -> Result<bool, DriverError> {
        let resp = self
            .http
            .post(format!("{}/orders/{}/complete", self.base_url, id))
            .send()
            .await?;
        Ok(resp.status().is_success())
    }
}

// =====================================================
// CYCLE PLANNING & EXECUTION
// =====================================================

/// Randomized shape of one cycle, separated from execution so the bounds
/// are unit-testable.
#[derive(Debug)]
pub struct CyclePlan {
    pub creates: Vec<(&'static str, i64)>,
    pub lists: usize,
    pub gets: usize,
}

pub fn plan_cycle(rng: &mut fastrand::Rng) -> CyclePlan {
    let creates = (0..rng.u64(1..=3))
        .map(|_| {
            let item = ITEMS[rng.usize(..ITEMS.len())];
            let quantity = rng.i64(1..=5);
            (item, quantity)
        })
        .collect();
    CyclePlan {
        creates,
        lists: rng.usize(1..=2),
        gets: rng.usize(2..=3),
    }
}

/// Run one cycle; returns the number of creates attempted
pub async fn run_cycle(
    client: &ApiClient,
    rng: &mut fastrand::Rng,
) -> Result<usize, DriverError> {
    let plan = plan_cycle(rng);

    let mut ids = Vec::new();
    for (item, quantity) in &plan.creates {
        if let Some(id) = client.create_order(item, *quantity).await? {
            ids.push(id);
        }
    }

    for _ in 0..plan.lists {
        client.list_orders().await?;
    }

    if !ids.is_empty() {
        for _ in 0..plan.gets {
            let id = &ids[rng.usize(..ids.len())];
            client.get_order(id).await?;
        }
    }

    // Always one guaranteed miss; produces a warning log server-side
    client.get_order(INVALID_ORDER_ID).await?;

    if !ids.is_empty() {
        let id = &ids[rng.usize(..ids.len())];
        client.complete_order(id).await?;
    }

    Ok(plan.creates.len())
}

// =====================================================
// RUN LOOP
// =====================================================

/// Drive cycles until the count is exhausted or the stop flag is raised.
/// Returns the number of cycles completed.
pub async fn run(
    config: DriverConfig,
    mut shutdown: watch::Receiver<bool>,
) -> Result<u64, DriverError> {
    let client = ApiClient::new(&config.base_url)?;
    let mut rng = fastrand::Rng::new();
    let multi = config.count.map_or(true, |n| n > 1);

    print!("Generating traffic -> {}", config.base_url);
    match config.count {
        None => println!(" (loop every {}s, Ctrl+C to stop)", config.interval.as_secs_f64()),
        Some(n) if n > 1 => println!(" ({} cycles, {}s apart)", n, config.interval.as_secs_f64()),
        Some(_) => println!(),
    }
    println!();

    let mut cycle: u64 = 0;
    loop {
        if *shutdown.borrow() {
            break;
        }
        cycle += 1;

        if config.verbose {
            let prefix = if multi { format!("[{cycle}] ") } else { String::new() };
            println!("{prefix}Cycle {cycle}...");
        } else if multi {
            print!("[{cycle}] Cycle {cycle}... ");
            io::stdout().flush().ok();
        }

        let created = run_cycle(&client, &mut rng).await?;

        if config.verbose {
            println!("  -> created {created} orders; list; get(s); 404; complete");
            if cycle > 1 {
                println!("  -> cycle {cycle} ok");
            }
        } else if multi {
            println!("ok");
        }

        if let Some(n) = config.count {
            if cycle >= n {
                break;
            }
        }

        // Pause between cycles, but wake immediately on a stop signal
        tokio::select! {
            _ = tokio::time::sleep(config.interval) => {}
            _ = wait_for_stop(&mut shutdown) => {}
        }
    }

    Ok(cycle)
}

/// Resolves once the stop flag is raised. If the sender goes away without
/// raising it, parks forever so the paced sleep finishes instead.
async fn wait_for_stop(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
        if *shutdown.borrow() {
            return;
        }
    }
}
