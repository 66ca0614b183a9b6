// generate_key.rs
// Utility to generate a new encryption key for the credential vault

#[path = "services/crypto.rs"]
#[allow(dead_code)]
mod crypto;

use crypto::CryptoService;

fn main() {
    println!("Generating new AES-256 encryption key...\n");

    let key = CryptoService::generate_key();

    println!("Key generated successfully!\n");
    println!("Add this to your .env file:");
    println!("-------------------------------------------------");
    println!("ENCRYPTION_MASTER_KEY={}", key);
    println!("-------------------------------------------------");
    println!("\nIMPORTANT:");
    println!("  - Keep this key secure and never commit it to version control");
    println!("  - Store a backup in a secure location");
    println!("  - If you lose this key, stored site credentials cannot be recovered");
}
