use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let key = std::env::var("MARKET_API_KEY").unwrap_or_else(|_| "test-key".to_string());
    let app_code = std::env::var("APP_CODE").unwrap_or_else(|_| "570".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("mock marketplace {app_code} listening on {addr}");
    mock_server::run(listener, mock_server::MockMarket::new(&key, &app_code)).await
}
