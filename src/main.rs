// BEL performance report CLI
// Loads a snapshot export and prints the dashboard numbers for one year.

use anyhow::{Context, Result};
use bel_performance::{
    evaluate, performance_by_level, project_all, summarize, CutoffPolicy, QuerySpec, RegionTable,
    SortDirection, SortKey,
};
use chrono::Utc;
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: bel-performance <snapshot.json> [year] [monthly.csv]");
        std::process::exit(1);
    }

    let snapshot_path = Path::new(&args[1]);
    let year: Option<i32> = match args.get(2) {
        Some(raw) => Some(raw.parse().with_context(|| format!("Invalid year: {}", raw))?),
        None => None,
    };
    let csv_path = args.get(3).map(Path::new);

    run_report(snapshot_path, year, csv_path)
}

fn run_report(snapshot_path: &Path, year: Option<i32>, csv_path: Option<&Path>) -> Result<()> {
    println!("📊 BEL Performance Report");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Load snapshot
    println!("\n📂 Loading snapshot...");
    let mut store = bel_performance::load_store(snapshot_path)?;
    println!("✓ Loaded {} BEL profiles", store.len());

    // 2. Merge optional monthly CSV
    if let Some(path) = csv_path {
        println!("\n📂 Merging monthly CSV...");
        let rows = bel_performance::load_monthly_csv(path)?;
        let row_count = rows.len();
        bel_performance::merge_monthly_rows(&mut store, rows)?;
        println!("✓ Merged {} monthly rows", row_count);
    }

    // 3. Cutoff policy from today's date; report year defaults to it
    let policy = CutoffPolicy::through_date(Utc::now().date_naive());
    let year = year.unwrap_or_else(|| policy.current_year());
    let complete = policy.months_for(year);
    println!(
        "\n🗓️  Year {} ({} complete month{})",
        year,
        complete.len(),
        if complete.len() == 1 { "" } else { "s" }
    );

    // 4. Portfolio summary
    let profiles = store.all();
    let summary = summarize(&profiles, year, &policy);

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("💼 Portfolio ({} BELs)", summary.count);
    println!("   Clicks:    {}", summary.total_clicks);
    println!("   Orders:    {}", summary.total_orders);
    println!("   Revenue:   ${:.2}", summary.total_revenue);
    println!("   Avg CVR:   {:.2}%", summary.avg_conversion_rate);
    println!("   Avg AOV:   ${:.2}", summary.avg_aov);

    // 5. Per-level breakdown
    println!("\n🏅 Performance by level");
    for row in performance_by_level(&profiles, year, &policy) {
        println!(
            "   {:<9} {:>4} BELs  {:>9} clicks  {:>7} orders  ${:>12.2}  {:>6.2}%  ${:>9.2}",
            row.level.as_str(),
            row.count,
            row.clicks,
            row.orders,
            row.revenue,
            row.conv_rate,
            row.aov
        );
    }

    // 6. Top 10 by revenue through the shared query pipeline
    let records = project_all(&profiles, year, &policy, &RegionTable::new());
    let mut spec = QuerySpec::new();
    spec.sort_key = Some(SortKey::Revenue);
    spec.sort_dir = SortDirection::Desc;
    spec.page_size = 10;

    let top = evaluate(&records, &spec);
    println!("\n🏆 Top {} of {} by revenue", top.page.len(), top.total);
    for record in &top.page {
        println!(
            "   {:<8} {:<24} {:<9} ${:>12.2}  {:>6.2}%",
            record.id,
            record.name,
            record.level.as_str(),
            record.revenue,
            record.conversion_rate
        );
    }

    println!("\n✅ Report complete");
    Ok(())
}
