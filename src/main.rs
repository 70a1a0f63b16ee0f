use anyhow::Result;
use claimql::query::{QueryEngine, QueryResults};
use claimql::store::{MemoryStatementStore, StatementRecord};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    println!("ClaimQL v{}", claimql::version());
    println!("==========================================");
    println!();

    let store = seed_store()?;
    println!("Seeded {} statements", store.len());
    let engine = QueryEngine::new(store);

    // Demo 1: direct-value pattern with labels
    let query = "SELECT ?item ?label WHERE { ?item prop:P31 item:Q5 }";
    println!("\nQuery 1: {}", query);
    match engine.run_query(query).await {
        Ok(results) => print_results(&results),
        Err(e) => println!("  ✗ {}", e),
    }

    // Demo 2: statement pattern with a qualifier join
    let query = "SELECT ?item ?start WHERE { ?item claim:P108 ?st . ?st value: item:Q9531 . ?st qual:P580 ?start }";
    println!("\nQuery 2: {}", query);
    match engine.run_query(query).await {
        Ok(results) => print_results(&results),
        Err(e) => println!("  ✗ {}", e),
    }

    // Demo 3: wildcard projection over employments
    let query = "SELECT * WHERE { ?item claim:P108 ?st . ?st value: ?employer }";
    println!("\nQuery 3: {}", query);
    match engine.run_query(query).await {
        Ok(results) => print_results(&results),
        Err(e) => println!("  ✗ {}", e),
    }

    // Demo 4: JSON output
    let query = "SELECT ?item ?label WHERE { ?item prop:P31 item:Q5 } LIMIT 10";
    println!("\nQuery 4 (JSON): {}", query);
    let results = engine.run_query(query).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);

    // Demo 5: only SELECT executes
    let query = "CONSTRUCT { ?s ?p ?o } WHERE { ?s prop:P31 item:Q5 }";
    println!("\nQuery 5: {}", query);
    match engine.run_query(query).await {
        Ok(results) => print_results(&results),
        Err(e) => println!("  ✗ {}", e),
    }

    Ok(())
}

/// A small Wikidata-flavored dataset: people, employers, a qualifier and a
/// reference.
fn seed_store() -> Result<MemoryStatementStore> {
    let mut store = MemoryStatementStore::new();

    store.insert_statement(StatementRecord::new("s1", "Q42", "P31", "Q5"))?;
    store.insert_statement(StatementRecord::new("s2", "Q80", "P31", "Q5"))?;
    store.insert_statement(StatementRecord::new("s3", "Q937", "P31", "Q5"))?;
    store.insert_statement(StatementRecord::new("s4", "Q42", "P108", "Q9531"))?;
    store.insert_statement(StatementRecord::new("s5", "Q80", "P108", "Q42944"))?;

    store.insert_qualifier("s4", "P580", "1996")?;
    store.insert_reference("s4", "P248", "Q36578")?;
    store.insert_qualifier("s5", "P580", "1984")?;

    store.set_label("Q42", "Douglas Adams");
    store.set_label("Q80", "Tim Berners-Lee");
    store.set_label("Q937", "Albert Einstein");

    Ok(store)
}

fn print_results(results: &QueryResults) {
    if results.is_empty() {
        println!("  → no rows");
        return;
    }
    for row in results.iter() {
        let rendered: Vec<String> = row
            .iter()
            .map(|(variable, value)| format!("{}={}", variable, value))
            .collect();
        println!("  → {}", rendered.join("  "));
    }
    println!("  ({} row(s))", results.len());
}
