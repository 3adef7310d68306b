use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client_core::{
    session::{BrowseSession, FilterValues},
    transport::{HttpScanOrderApi, ScanOrderApi},
    FeedEvent, OrderFeed,
};
use shared::{
    domain::{OrderId, PractitionerId},
    protocol::{CreatePatientRequest, SubmitOrderRequest, UpdateOrderStatusRequest},
};
use tracing_subscriber::EnvFilter;

mod settings;

#[derive(Parser, Debug)]
#[command(name = "scan-orders", about = "Browse and maintain scan orders from the terminal")]
struct Args {
    /// Server base URL; falls back to scan-orders.toml or SCAN_ORDERS_SERVER_URL.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Page through scan orders with the tab/filter/search controls of the app.
    Browse {
        #[arg(long, default_value = "All")]
        tab: String,
        #[arg(long, default_value = "")]
        search: String,
        /// Sort label, e.g. "Alphabetical" or "Latest scan".
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Include orders whose scans were already uploaded.
        #[arg(long)]
        uploaded: bool,
        /// How many pages to pull before stopping.
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Create a patient and print the order row the server answers with.
    CreatePatient {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Submit a finished order.
    SubmitOrder {
        #[arg(long)]
        order_id: i64,
    },
    /// Rewrite the status tag of an order.
    UpdateStatus {
        #[arg(long)]
        order_id: i64,
        #[arg(long)]
        status: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = Args::parse();
    let settings = settings::load_settings();
    let server_url = args.server_url.unwrap_or(settings.server_url);
    let practitioner_id = settings.practitioner_id.map(PractitionerId);
    tracing::debug!(server_url = %server_url, "resolved server url");

    match args.command {
        Command::Browse {
            tab,
            search,
            sort,
            from,
            to,
            uploaded,
            pages,
        } => {
            let session = BrowseSession::new();
            session.set_practitioner(practitioner_id).await;
            session.select_tab(tab).await;
            if sort.is_some() || from.is_some() || to.is_some() || uploaded {
                session
                    .set_filters(FilterValues {
                        sort_option: sort,
                        start_date: from,
                        end_date: to,
                        display_uploaded_scans: uploaded,
                    })
                    .await;
            }

            let feed = OrderFeed::over_http(server_url);
            let mut events = feed.subscribe_events();
            let reporter = tokio::spawn(async move {
                while let Ok(event) = events.recv().await {
                    if let FeedEvent::SearchFailed(message) = event {
                        eprintln!("search failed: {message}");
                    }
                }
            });

            feed.fetch(session.fetch_params(search, 1, false).await)
                .await?;
            let mut fetched = 1;
            while fetched < pages && feed.snapshot().await.can_load_more {
                feed.load_more().await?;
                fetched += 1;
            }
            reporter.abort();

            let snapshot = feed.snapshot().await;
            for order in &snapshot.orders {
                let name = format!(
                    "{} {}",
                    order.patient_first_name.as_deref().unwrap_or("-"),
                    order.patient_last_name.as_deref().unwrap_or("-")
                );
                println!(
                    "{:>8}  {:<24}  {:<22}  {}",
                    order.order_id.0,
                    name,
                    order.status.as_deref().unwrap_or("-"),
                    order
                        .completion_date
                        .as_deref()
                        .or(order.modify_date.as_deref())
                        .unwrap_or("-"),
                );
            }
            println!("showing {} of {} orders", snapshot.orders.len(), snapshot.total_items);
        }
        Command::CreatePatient {
            first_name,
            last_name,
            gender,
            email,
            phone,
        } => {
            let api = HttpScanOrderApi::new(server_url);
            let request = CreatePatientRequest {
                first_name,
                last_name,
                gender,
                email,
                phone,
                practitioner_id,
                ..CreatePatientRequest::default()
            };
            let record = api.create_patient(&request).await?.into_result()?;
            println!(
                "created order {} for {} {}",
                record.order_id.0,
                record.patient_first_name.as_deref().unwrap_or("-"),
                record.patient_last_name.as_deref().unwrap_or("-"),
            );
        }
        Command::SubmitOrder { order_id } => {
            let api = HttpScanOrderApi::new(server_url);
            let record = api
                .submit_order(&SubmitOrderRequest {
                    order_id: OrderId(order_id),
                })
                .await?
                .into_result()?;
            println!(
                "order {} submitted, status now {}",
                record.order_id.0,
                record.status.as_deref().unwrap_or("-"),
            );
        }
        Command::UpdateStatus { order_id, status } => {
            let api = HttpScanOrderApi::new(server_url);
            let record = api
                .update_order_status(&UpdateOrderStatusRequest {
                    order_id: OrderId(order_id),
                    order_status: status,
                })
                .await?
                .into_result()?;
            println!(
                "order {} status now {}",
                record.order_id.0,
                record.status.as_deref().unwrap_or("-"),
            );
        }
    }

    Ok(())
}
