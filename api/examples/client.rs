use reqwest::Client;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();
    let base_url = std::env::var("BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_string());

    println!("🔍 Testing aid matching API");

    println!("\n📋 Health Check:");
    let health_response = client
        .get(format!("{}/health", base_url))
        .send()
        .await?;
    println!("Status: {}", health_response.status());
    println!("Response: {}", health_response.text().await?);

    println!("\n🤝 Analyze:");
    let payload = json!({
        "userInput": "I lost my job and have two children. The electricity bill is overdue."
    });

    let response = client
        .post(format!("{}/api/analyze", base_url))
        .json(&payload)
        .send()
        .await?;

    println!("Status: {}", response.status());
    let body: serde_json::Value = response.json().await?;
    println!("Response: {}", serde_json::to_string_pretty(&body)?);

    println!("\n✅ Client test completed!");
    Ok(())
}
