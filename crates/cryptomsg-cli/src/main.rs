//! Command-line interface for `cryptomsg`.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use aes_core::{cbc_decrypt, cbc_encrypt, decrypt_block, encrypt_block, expand_key_bytes};
use anyhow::{bail, ensure, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cryptomsg::{trim_padding, Config, CryptoMsg, KeyPolicy};
use env_logger::Env;
use log::info;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// AES-CBC message encryption CLI.
#[derive(Parser)]
#[command(name = "cryptomsg", version, author, about = "Encrypt and decrypt messages with AES-CBC")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a file, space-padding it to whole blocks.
    Enc {
        #[command(flatten)]
        keys: KeyArgs,
        #[command(flatten)]
        io: IoArgs,
    },
    /// Decrypt a file produced by `enc`.
    Dec {
        #[command(flatten)]
        keys: KeyArgs,
        #[command(flatten)]
        io: IoArgs,
        /// Strip trailing pad spaces from the plaintext.
        #[arg(long, default_value_t = false)]
        trim: bool,
    },
    /// Check the cipher against FIPS-197 and SP 800-38A known-answer vectors.
    Selftest,
    /// Run a local demo: random key, IV and message, encrypt then decrypt.
    Demo {
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct KeyArgs {
    /// Key text; padded or truncated according to --key-policy.
    #[arg(long, env = "CRYPTOMSG_KEY", value_name = "TEXT")]
    key: Option<String>,
    /// Key as hex; takes precedence over --key and CRYPTOMSG_KEY.
    #[arg(long, value_name = "HEX")]
    key_hex: Option<String>,
    /// IV text; defaults to the key.
    #[arg(long, env = "CRYPTOMSG_IV", value_name = "TEXT")]
    iv: Option<String>,
    /// IV as hex; takes precedence over --iv and CRYPTOMSG_IV.
    #[arg(long, value_name = "HEX")]
    iv_hex: Option<String>,
    /// How keys that are not 16, 24 or 32 bytes are handled.
    #[arg(long, value_enum, default_value_t = PolicyArg::SpacePad)]
    key_policy: PolicyArg,
}

#[derive(Args)]
struct IoArgs {
    /// Input file.
    #[arg(long, value_name = "FILE")]
    input: PathBuf,
    /// Output file.
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
    /// Ciphertext files hold hex text instead of raw bytes.
    #[arg(long, default_value_t = false)]
    hex: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    SpacePad,
    NearestSize,
    Strict,
}

impl From<PolicyArg> for KeyPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::SpacePad => KeyPolicy::SpacePad,
            PolicyArg::NearestSize => KeyPolicy::NearestSize,
            PolicyArg::Strict => KeyPolicy::Strict,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Enc { keys, io } => cmd_enc(&keys, &io),
        Commands::Dec { keys, io, trim } => cmd_dec(&keys, &io, trim),
        Commands::Selftest => cmd_selftest(),
        Commands::Demo { seed } => cmd_demo(seed),
    }
}

fn cmd_enc(keys: &KeyArgs, io: &IoArgs) -> Result<()> {
    let ctx = build_context(keys)?;
    let plaintext = read_input(&io.input)?;
    let ciphertext = ctx.encrypt_msg(&plaintext).context("encrypt message")?;
    let out = if io.hex {
        hex::encode(&ciphertext).into_bytes()
    } else {
        ciphertext
    };
    write_output(&io.output, &out)?;
    info!(
        "encrypted {} bytes with {} into {}",
        plaintext.len(),
        ctx.key_size(),
        io.output.display()
    );
    Ok(())
}

fn cmd_dec(keys: &KeyArgs, io: &IoArgs, trim: bool) -> Result<()> {
    let ctx = build_context(keys)?;
    let raw = read_input(&io.input)?;
    let ciphertext = if io.hex {
        let text = String::from_utf8(raw).context("hex input is not UTF-8")?;
        hex::decode(text.trim()).context("decode ciphertext hex")?
    } else {
        raw
    };
    let plaintext = ctx.decrypt_msg(&ciphertext).context("decrypt message")?;
    let plaintext = if trim {
        trim_padding(&plaintext)
    } else {
        &plaintext[..]
    };
    write_output(&io.output, plaintext)?;
    info!(
        "decrypted {} bytes with {} into {}",
        ciphertext.len(),
        ctx.key_size(),
        io.output.display()
    );
    Ok(())
}

/// FIPS-197 appendix C single-block vectors.
const BLOCK_VECTORS: [(&str, &str, &str); 4] = [
    (
        "000102030405060708090a0b0c0d0e0f",
        "00112233445566778899aabbccddeeff",
        "69c4e0d86a7b0430d8cdb78070b4c55a",
    ),
    (
        "000102030405060708090a0b0c0d0e0f1011121314151617",
        "00112233445566778899aabbccddeeff",
        "dda97ca4864cdfe06eaf70a0ec0d7191",
    ),
    (
        "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
        "00112233445566778899aabbccddeeff",
        "8ea2b7ca516745bfeafc49904b496089",
    ),
    (
        "00000000000000000000000000000000",
        "00000000000000000000000000000000",
        "66e94bd4ef8a2c3b884cfa59ca342b2e",
    ),
];

/// SP 800-38A F.2 CBC vectors (key, ciphertext); IV and plaintext are shared.
const CBC_VECTORS: [(&str, &str); 3] = [
    (
        "2b7e151628aed2a6abf7158809cf4f3c",
        "7649abac8119b246cee98e9b12e9197d5086cb9b507219ee95db113a917678b2\
         73bed6b8e3c1743b7116e69e222295163ff1caa1681fac09120eca307586e1a7",
    ),
    (
        "8e73b0f7da0e6452c810f32b809079e562f8ead2522c6b7b",
        "4f021db243bc633d7178183a9fa071e8b4d9ada9ad7dedf4e5e738763f69145a\
         571b242012fb7ae07fa9baac3df102e008b0e27988598881d920a9e64f5615cd",
    ),
    (
        "603deb1015ca71be2b73aef0857d77811f352c073b6108d72d9810a30914dff4",
        "f58c4c04d6e5f1ba779eabfb5f7bfbd69cfc4e967edb808d679f777bc6702c7d\
         39f23369a9d9bacfa530e26304231461b2eb05e2c39be9fcda6c19078c6a9d1b",
    ),
];
const CBC_IV: &str = "000102030405060708090a0b0c0d0e0f";
const CBC_PLAIN: &str = "6bc1bee22e409f96e93d7e117393172aae2d8a571e03ac9c9eb76fac45af8e51\
                         30c81c46a35ce411e5fbc1191a0a52eff69f2445df4f9b17ad2b417be66c3710";

fn cmd_selftest() -> Result<()> {
    for (key_hex, plain_hex, cipher_hex) in BLOCK_VECTORS {
        let round_keys = expand_key_bytes(&hex::decode(key_hex)?)?;
        let plain = aes_core::block_from_slice(&hex::decode(plain_hex)?)?;
        let cipher = encrypt_block(&plain, &round_keys);
        ensure!(
            hex::encode(cipher) == cipher_hex,
            "{} block vector mismatch for key {key_hex}",
            round_keys.key_size()
        );
        ensure!(
            decrypt_block(&cipher, &round_keys) == plain,
            "{} block decryption mismatch for key {key_hex}",
            round_keys.key_size()
        );
        println!("ok: {} block {key_hex}", round_keys.key_size());
    }

    let iv = hex::decode(CBC_IV)?;
    let plain = hex::decode(CBC_PLAIN)?;
    for (key_hex, cipher_hex) in CBC_VECTORS {
        let round_keys = expand_key_bytes(&hex::decode(key_hex)?)?;
        let cipher = cbc_encrypt(&plain, &iv, &round_keys)?;
        ensure!(
            hex::encode(&cipher) == cipher_hex,
            "{} CBC vector mismatch",
            round_keys.key_size()
        );
        ensure!(
            cbc_decrypt(&cipher, &iv, &round_keys)? == plain,
            "{} CBC decryption mismatch",
            round_keys.key_size()
        );
        println!("ok: {} CBC", round_keys.key_size());
    }
    Ok(())
}

fn cmd_demo(seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    let mut key = [0u8; 32];
    let mut iv = [0u8; 16];
    rng.fill_bytes(&mut key);
    rng.fill_bytes(&mut iv);
    let mut message = vec![0u8; rng.gen_range(1..64)];
    rng.fill_bytes(&mut message);

    let ctx = CryptoMsg::with_config(&key, Some(&iv), Config::default())?;
    let ciphertext = ctx.encrypt_msg(&message)?;
    let decrypted = ctx.decrypt_msg(&ciphertext)?;

    println!("demo key: {}", hex::encode(key));
    println!("iv: {}", hex::encode(iv));
    println!("plaintext: {}", hex::encode(&message));
    println!("ciphertext: {}", hex::encode(&ciphertext));
    println!("decrypted: {}", hex::encode(&decrypted));
    if decrypted[..message.len()] != message[..]
        || decrypted[message.len()..].iter().any(|&b| b != b' ')
    {
        bail!("demo roundtrip failed");
    }
    Ok(())
}

fn build_context(keys: &KeyArgs) -> Result<CryptoMsg> {
    let key = secret_bytes(keys.key.as_deref(), keys.key_hex.as_deref(), "key")?
        .context("a key is required (--key, --key-hex or CRYPTOMSG_KEY)")?;
    let iv = secret_bytes(keys.iv.as_deref(), keys.iv_hex.as_deref(), "IV")?;
    let config = Config::default().with_key_policy(keys.key_policy.into());
    CryptoMsg::with_config(&key, iv.as_deref(), config).context("build cipher context")
}

/// Hex input wins, so an explicit `--*-hex` flag overrides text from the environment.
fn secret_bytes(text: Option<&str>, hex_str: Option<&str>, what: &str) -> Result<Option<Vec<u8>>> {
    match (text, hex_str) {
        (_, Some(hex_str)) => hex::decode(hex_str.trim())
            .map(Some)
            .with_context(|| format!("decode {what} hex")),
        (Some(text), None) => Ok(Some(text.as_bytes().to_vec())),
        (None, None) => Ok(None),
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read {}", path.display()))
}

fn write_output(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).with_context(|| format!("write {}", path.display()))
}

fn seeded_rng(seed: Option<u64>) -> ChaCha20Rng {
    match seed {
        Some(value) => ChaCha20Rng::seed_from_u64(value),
        None => ChaCha20Rng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn selftest_passes() {
        cmd_selftest().unwrap();
    }

    #[test]
    fn demo_round_trips_with_seed() {
        cmd_demo(Some(42)).unwrap();
    }

    #[test]
    fn hex_key_wins_over_text() {
        let bytes = secret_bytes(Some("abc"), None, "key").unwrap();
        assert_eq!(bytes.as_deref(), Some(&b"abc"[..]));
        let bytes = secret_bytes(None, Some("00ff"), "key").unwrap();
        assert_eq!(bytes, Some(vec![0x00, 0xff]));
        let bytes = secret_bytes(Some("abc"), Some("00ff"), "key").unwrap();
        assert_eq!(bytes, Some(vec![0x00, 0xff]));
        assert!(secret_bytes(None, Some("zz"), "key").is_err());
        assert_eq!(secret_bytes(None, None, "iv").unwrap(), None);
    }

    #[test]
    fn hex_flags_override_env_key_and_iv() {
        std::env::set_var("CRYPTOMSG_KEY", "envkey");
        std::env::set_var("CRYPTOMSG_IV", "enviv");
        let parsed = Cli::try_parse_from([
            "cryptomsg",
            "enc",
            "--key-hex",
            "00112233445566778899aabbccddeeff",
            "--iv-hex",
            "000102030405060708090a0b0c0d0e0f",
            "--input",
            "a",
            "--output",
            "b",
        ]);
        let env_only = Cli::try_parse_from(["cryptomsg", "enc", "--input", "a", "--output", "b"]);
        std::env::remove_var("CRYPTOMSG_KEY");
        std::env::remove_var("CRYPTOMSG_IV");

        let Commands::Enc { keys, .. } = parsed.unwrap().command else {
            panic!("expected enc");
        };
        assert_eq!(keys.key.as_deref(), Some("envkey"));
        let ctx = build_context(&keys).unwrap();
        let key = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        let iv = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let expected = CryptoMsg::new(key.as_slice(), Some(iv.as_slice())).unwrap();
        assert_eq!(
            ctx.encrypt_msg(b"msg").unwrap(),
            expected.encrypt_msg(b"msg").unwrap()
        );

        let Commands::Enc { keys, .. } = env_only.unwrap().command else {
            panic!("expected enc");
        };
        let ctx = build_context(&keys).unwrap();
        let expected = CryptoMsg::new(b"envkey", Some(b"enviv")).unwrap();
        assert_eq!(
            ctx.encrypt_msg(b"msg").unwrap(),
            expected.encrypt_msg(b"msg").unwrap()
        );
    }

    #[test]
    fn enc_then_dec_through_files() {
        let dir = std::env::temp_dir().join(format!("cryptomsg-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let plain = dir.join("plain.txt");
        let cipher = dir.join("cipher.hex");
        let back = dir.join("back.txt");
        fs::write(&plain, b"YOUR MESSAGE").unwrap();

        let keys = KeyArgs {
            key: Some("YOUR KEY".into()),
            key_hex: None,
            iv: None,
            iv_hex: Some(hex::encode("YOUR IV")),
            key_policy: PolicyArg::SpacePad,
        };
        cmd_enc(
            &keys,
            &IoArgs {
                input: plain.clone(),
                output: cipher.clone(),
                hex: true,
            },
        )
        .unwrap();
        assert_eq!(fs::read(&cipher).unwrap().len(), 32);

        cmd_dec(
            &keys,
            &IoArgs {
                input: cipher,
                output: back.clone(),
                hex: true,
            },
            true,
        )
        .unwrap();
        assert_eq!(fs::read(&back).unwrap(), b"YOUR MESSAGE");
        fs::remove_dir_all(&dir).unwrap();
    }
}
