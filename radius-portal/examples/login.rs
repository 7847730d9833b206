use std::time::Duration;

use radius_portal::{AuthStatus, AuthorizationPolicy, Client, ClientConfigBuilder};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // NOTE: this assumes you have a RADIUS server running already, e.g. FreeRADIUS with a test user

    let host = std::env::var("RADIUS_HOST").unwrap_or(String::from("127.0.0.1"));
    let config = ClientConfigBuilder::new()
        .host(host)
        .secret(b"this shouldn't be hardcoded")
        .timeout(Duration::from_secs(3))
        .build()
        .expect("example config should be valid");

    let client = Client::new(config);
    let auth_result = client.authenticate("someuser", "hunter2").await;

    match auth_result {
        Ok(resp) if resp.status == AuthStatus::Accept => {
            let decision = AuthorizationPolicy::default().authorize(&resp.attributes);
            if decision.allowed {
                println!("Authentication successful: {}", decision.message);
            } else {
                println!("Authenticated, but not authorized: {}", decision.message);
            }
        }
        Ok(resp) => println!("Authentication failed. Full response: {:?}", resp),
        Err(e) => eprintln!("Error: {e}"),
    }
}
