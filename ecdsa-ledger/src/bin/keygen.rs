//! Generate a secp256k1 key pair and print its ledger address.
//!
//! Pass an existing 32-byte hex secret to print the matching public key and
//! address instead of generating a new one.

use ecdsa_ledger::KeyPair;

fn main() -> anyhow::Result<()> {
    let keypair = match std::env::args().nth(1) {
        Some(secret_hex) => {
            let mut secret = [0u8; 32];
            hex::decode_to_slice(secret_hex.trim_start_matches("0x"), &mut secret)?;
            KeyPair::from_secret(&secret)?
        }
        None => KeyPair::generate(),
    };

    println!("private key: {}", hex::encode(keypair.secret_key()));
    println!("public key:  {}", keypair.public_key().to_hex());
    println!("address:     {}", keypair.address());
    Ok(())
}
