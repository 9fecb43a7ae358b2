//! Dispatch to the external signature primitives the protocol treats as
//! collaborators: `KeyGen`, `Sign`, `Verify` behind one tagged enum pair,
//! the same shape used elsewhere for ML-KEM/ML-DSA wrappers and for a
//! `Signer`/`verify_signature` pair driving detached signatures.

use crate::error::{MtssError, ParamError};
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroize;

/// Recognised underlying signature algorithm identifiers.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CdssId {
    Ecdsa,
    Rsa,
    SphincsPlus,
    Falcon,
    Dilithium,
}

impl CdssId {
    pub fn as_str(self) -> &'static str {
        match self {
            CdssId::Ecdsa => "ecdsa",
            CdssId::Rsa => "rsa",
            CdssId::SphincsPlus => "sphincsplus",
            CdssId::Falcon => "falcon",
            CdssId::Dilithium => "dilithium",
        }
    }
}

impl fmt::Display for CdssId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CdssId {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ecdsa" => Ok(CdssId::Ecdsa),
            "rsa" => Ok(CdssId::Rsa),
            "sphincsplus" => Ok(CdssId::SphincsPlus),
            "falcon" => Ok(CdssId::Falcon),
            "dilithium" => Ok(CdssId::Dilithium),
            other => Err(ParamError::UnknownCdss(other.to_string())),
        }
    }
}

/// Opaque secret key; the variant picked at `KeyGen` time determines which
/// branch `sign` takes. `Drop` zeroizes raw PQ key bytes; the classical
/// variants rely on their own crates' zeroizing `Drop` impls.
pub enum SecretKey {
    Ecdsa(p256::ecdsa::SigningKey),
    Rsa(Box<rsa::RsaPrivateKey>),
    SphincsPlus(Vec<u8>),
    Falcon(Vec<u8>),
    Dilithium(Vec<u8>),
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        match self {
            SecretKey::SphincsPlus(b) | SecretKey::Falcon(b) | SecretKey::Dilithium(b) => {
                b.zeroize()
            }
            SecretKey::Ecdsa(_) | SecretKey::Rsa(_) => {}
        }
    }
}

/// Opaque public key, one variant per supported [`CdssId`].
#[derive(Clone)]
pub enum PublicKey {
    Ecdsa(p256::ecdsa::VerifyingKey),
    Rsa(Box<rsa::RsaPublicKey>),
    SphincsPlus(Vec<u8>),
    Falcon(Vec<u8>),
    Dilithium(Vec<u8>),
}

/// A freshly generated key pair, tagged with the algorithm that produced it.
pub struct KeyPair {
    pub cdss: CdssId,
    pub sk: SecretKey,
    pub pk: PublicKey,
}

/// Generate a fresh key pair for `cdss` using the OS RNG.
pub fn keygen(cdss: CdssId) -> Result<KeyPair, MtssError> {
    match cdss {
        CdssId::Ecdsa => {
            let sk = p256::ecdsa::SigningKey::random(&mut rand::rngs::OsRng);
            let pk = *sk.verifying_key();
            Ok(KeyPair { cdss, sk: SecretKey::Ecdsa(sk), pk: PublicKey::Ecdsa(pk) })
        }
        CdssId::Rsa => {
            let sk = rsa::RsaPrivateKey::new(&mut rand::rngs::OsRng, 2048)
                .map_err(|e| MtssError::Signature(format!("rsa keygen: {e}")))?;
            let pk = rsa::RsaPublicKey::from(&sk);
            Ok(KeyPair {
                cdss,
                sk: SecretKey::Rsa(Box::new(sk)),
                pk: PublicKey::Rsa(Box::new(pk)),
            })
        }
        CdssId::SphincsPlus => {
            use pqcrypto_sphincsplus::sphincssha2128ssimple as sphincs;
            use pqcrypto_traits::sign::{PublicKey as _, SecretKey as _};
            let (pk, sk) = sphincs::keypair();
            Ok(KeyPair {
                cdss,
                sk: SecretKey::SphincsPlus(sk.as_bytes().to_vec()),
                pk: PublicKey::SphincsPlus(pk.as_bytes().to_vec()),
            })
        }
        CdssId::Falcon => {
            use pqcrypto_falcon::falcon512 as falcon;
            use pqcrypto_traits::sign::{PublicKey as _, SecretKey as _};
            let (pk, sk) = falcon::keypair();
            Ok(KeyPair {
                cdss,
                sk: SecretKey::Falcon(sk.as_bytes().to_vec()),
                pk: PublicKey::Falcon(pk.as_bytes().to_vec()),
            })
        }
        CdssId::Dilithium => {
            use pqcrypto_mldsa::mldsa65 as dilithium;
            use pqcrypto_traits::sign::{PublicKey as _, SecretKey as _};
            let (pk, sk) = dilithium::keypair();
            Ok(KeyPair {
                cdss,
                sk: SecretKey::Dilithium(sk.as_bytes().to_vec()),
                pk: PublicKey::Dilithium(pk.as_bytes().to_vec()),
            })
        }
    }
}

/// Sign `message` (the canonical payload bytes `S`) with `sk`.
pub fn sign(sk: &SecretKey, message: &[u8]) -> Result<Vec<u8>, MtssError> {
    use signature::Signer as _;
    match sk {
        SecretKey::Ecdsa(sk) => {
            let sig: p256::ecdsa::Signature = sk.sign(message);
            Ok(sig.to_der().as_bytes().to_vec())
        }
        SecretKey::Rsa(sk) => {
            let signing_key = rsa::pss::SigningKey::<sha2::Sha256>::new((**sk).clone());
            let sig = signature::RandomizedSigner::sign_with_rng(
                &signing_key,
                &mut rand::rngs::OsRng,
                message,
            );
            Ok(sig.to_vec())
        }
        SecretKey::SphincsPlus(sk_bytes) => {
            use pqcrypto_sphincsplus::sphincssha2128ssimple as sphincs;
            use pqcrypto_traits::sign::{DetachedSignature as _, SecretKey as _};
            let sk = sphincs::SecretKey::from_bytes(sk_bytes)
                .map_err(|_| MtssError::Signature("malformed sphincs+ secret key".into()))?;
            Ok(sphincs::detached_sign(message, &sk).as_bytes().to_vec())
        }
        SecretKey::Falcon(sk_bytes) => {
            use pqcrypto_falcon::falcon512 as falcon;
            use pqcrypto_traits::sign::{DetachedSignature as _, SecretKey as _};
            let sk = falcon::SecretKey::from_bytes(sk_bytes)
                .map_err(|_| MtssError::Signature("malformed falcon secret key".into()))?;
            Ok(falcon::detached_sign(message, &sk).as_bytes().to_vec())
        }
        SecretKey::Dilithium(sk_bytes) => {
            use pqcrypto_mldsa::mldsa65 as dilithium;
            use pqcrypto_traits::sign::{DetachedSignature as _, SecretKey as _};
            let sk = dilithium::SecretKey::from_bytes(sk_bytes)
                .map_err(|_| MtssError::Signature("malformed dilithium secret key".into()))?;
            Ok(dilithium::detached_sign(message, &sk).as_bytes().to_vec())
        }
    }
}

/// Verify `sig` over `message` under `pk`. Never errors: an unparsable
/// signature or key simply fails verification (external failures propagate
/// only for KeyGen/Sign; Verify is a boolean decision).
pub fn verify(pk: &PublicKey, message: &[u8], sig: &[u8]) -> bool {
    match pk {
        PublicKey::Ecdsa(pk) => {
            use signature::Verifier as _;
            match p256::ecdsa::Signature::from_der(sig) {
                Ok(sig) => pk.verify(message, &sig).is_ok(),
                Err(_) => false,
            }
        }
        PublicKey::Rsa(pk) => {
            let verifying_key = rsa::pss::VerifyingKey::<sha2::Sha256>::new((**pk).clone());
            match rsa::pss::Signature::try_from(sig) {
                Ok(sig) => signature::Verifier::verify(&verifying_key, message, &sig).is_ok(),
                Err(_) => false,
            }
        }
        PublicKey::SphincsPlus(pk_bytes) => {
            use pqcrypto_sphincsplus::sphincssha2128ssimple as sphincs;
            use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _};
            let (pk, sig) = match (
                sphincs::PublicKey::from_bytes(pk_bytes),
                sphincs::DetachedSignature::from_bytes(sig),
            ) {
                (Ok(pk), Ok(sig)) => (pk, sig),
                _ => return false,
            };
            sphincs::verify_detached_signature(&sig, message, &pk).is_ok()
        }
        PublicKey::Falcon(pk_bytes) => {
            use pqcrypto_falcon::falcon512 as falcon;
            use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _};
            let (pk, sig) = match (
                falcon::PublicKey::from_bytes(pk_bytes),
                falcon::DetachedSignature::from_bytes(sig),
            ) {
                (Ok(pk), Ok(sig)) => (pk, sig),
                _ => return false,
            };
            falcon::verify_detached_signature(&sig, message, &pk).is_ok()
        }
        PublicKey::Dilithium(pk_bytes) => {
            use pqcrypto_mldsa::mldsa65 as dilithium;
            use pqcrypto_traits::sign::{DetachedSignature as _, PublicKey as _};
            let (pk, sig) = match (
                dilithium::PublicKey::from_bytes(pk_bytes),
                dilithium::DetachedSignature::from_bytes(sig),
            ) {
                (Ok(pk), Ok(sig)) => (pk, sig),
                _ => return false,
            };
            dilithium::verify_detached_signature(&sig, message, &pk).is_ok()
        }
    }
}
