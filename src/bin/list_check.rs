use basket::sync::ListSynchronizer;
use basket::sync::graphql::GraphqlListClient;

#[tokio::main]
async fn main() {
    systemd_journal_logger::JournalLog::new()
        .unwrap()
        .with_syslog_identifier("basket-list-check".to_string())
        .install()
        .unwrap();
    log::set_max_level(log::LevelFilter::Info);

    let endpoint = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("BASKET_API_URL").ok());
    let Some(endpoint) = endpoint else {
        println!("Usage: list_check <api-url>  (or set BASKET_API_URL)");
        return;
    };

    println!("=== Shopping list at {} ===\n", endpoint);

    let client = match GraphqlListClient::new(&endpoint) {
        Ok(c) => c,
        Err(e) => {
            println!("  Client error: {}", e);
            return;
        }
    };

    let mut sync = ListSynchronizer::new(client);
    if !sync.load().await {
        println!("  Failed to load list (see journal for details).");
        return;
    }

    println!("List id: {}", sync.list_id().unwrap_or("?"));

    let (active, completed) = sync.items_by_status();
    println!("\nACTIVE ({}):", active.len());
    for item in &active {
        println!("  [ ] {}", item.value);
    }
    println!("\nCOMPLETED ({}):", completed.len());
    for item in &completed {
        println!("  [x] {}", item.value);
    }

    let mismatched = sync
        .items()
        .iter()
        .filter(|(key, item)| item.id.as_deref() != Some(key.as_str()))
        .count();
    if mismatched == 0 {
        println!("\nKey invariant holds for {} items.", sync.items().len());
    } else {
        println!("\nKEY MISMATCHES: {}", mismatched);
    }

    println!("\n=== Done ===");
}
