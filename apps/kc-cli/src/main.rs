//! kc - batch administration CLI for Keycloak
//!
//! Creates, updates, deletes and lists realm roles, users, clients, client
//! roles and client scopes across one or many realms.

#[tokio::main]
async fn main() {
    let code = kc_cli::cli::main_entry().await;
    std::process::exit(code);
}
