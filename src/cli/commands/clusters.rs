use crate::config::Config;
use crate::domain::Supplier;
use crate::services::ClusterService;
use serde_json::Value;

pub async fn cmd_clusters(config: &Config, supplier: Supplier) -> anyhow::Result<()> {
    let service = ClusterService::new(config.suppliers.clone());
    let table = service.clusters_table(supplier).await?;

    println!("Clusters for {supplier} ({}):", table.path);
    println!("{:-<70}", "");
    println!("{}", table.headers.join(" | "));

    for row in &table.rows {
        let cells: Vec<&str> = table
            .headers
            .iter()
            .map(|header| match row.get(header) {
                Some(Value::String(cell)) => cell.as_str(),
                _ => "",
            })
            .collect();
        println!("{}", cells.join(" | "));
    }

    println!("{:-<70}", "");
    println!("{} rows", table.rows.len());

    Ok(())
}
