//! Encrypts a message with each way of supplying a key and IV.

use cryptomsg::{trim_padding, CryptoMsg};

fn main() -> cryptomsg::Result<()> {
    let message = b"YOUR MESSAGE";

    // Built-in key and key-derived IV; anyone can decrypt this.
    let insecure = CryptoMsg::default();
    // Only a key: the IV is taken from the key bytes.
    let key_only = CryptoMsg::new(b"YOUR KEY", None)?;
    // Separate key and IV.
    let key_and_iv = CryptoMsg::new(b"YOUR KEY", Some(b"YOUR IV"))?;

    for (label, ctx) in [
        ("default", &insecure),
        ("key only", &key_only),
        ("key and iv", &key_and_iv),
    ] {
        let ciphertext = ctx.encrypt_msg(message)?;
        let plaintext = ctx.decrypt_msg(&ciphertext)?;
        assert_eq!(trim_padding(&plaintext), message);
        println!("{label:>10}: {}", hex::encode(&ciphertext));
    }
    Ok(())
}
