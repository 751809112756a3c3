use biostrap_client::{BiostrapClient, config::Config, http_client::ReqwestBiostrapClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example: expects BIOSTRAP_API_KEY in env
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {}", e);
            return Ok(());
        }
    };
    let client = ReqwestBiostrapClient::from_config(&cfg)?;
    let users = client.get_users(1, 5).await?;
    for user in &users.users {
        println!("{} <{}>", user.name, user.email);
    }
    if users.data_left {
        println!("more users on later pages");
    }
    Ok(())
}
