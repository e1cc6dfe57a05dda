use core::sync::atomic::{AtomicU8, Ordering};

/// The implementation family a call is routed to.
///
/// [`Backend::detect`] picks the best one for the running CPU. The
/// `*_with_backend` methods on [`Engine`](crate::Engine) accept any variant; one
/// the CPU cannot run degrades to [`Backend::Scalar`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Portable table-driven codec. Always available.
    Scalar = 1,
    /// AVX2 encode and decode kernels (x86 / x86_64).
    Avx2 = 2,
    /// NEON decode kernel (aarch64). Encoding uses the scalar codec.
    Neon = 3,
}

const UNPROBED: u8 = 0;

/// Cached result of the CPU probe. Written at most a handful of times (racing
/// first callers all compute the same answer), read on every call.
static DETECTED: AtomicU8 = AtomicU8::new(UNPROBED);

impl Backend {
    /// Returns the fastest backend this process can run.
    ///
    /// The CPU is probed on the first call and the answer is cached for the
    /// lifetime of the process. Priority: NEON, then AVX2, then scalar.
    #[inline]
    pub fn detect() -> Backend {
        match Self::from_u8(DETECTED.load(Ordering::Relaxed)) {
            Some(backend) => backend,
            None => {
                let backend = probe();
                DETECTED.store(backend as u8, Ordering::Relaxed);

                #[cfg(feature = "tracing")]
                tracing::debug!(backend = backend.name(), "base64 backend selected");

                backend
            }
        }
    }

    /// Whether this process can run the backend.
    pub fn is_available(self) -> bool {
        match self {
            Backend::Scalar => true,
            Backend::Avx2 => avx2_supported(),
            Backend::Neon => neon_supported(),
        }
    }

    /// The backend that actually performs encoding when `self` is selected.
    ///
    /// NEON only accelerates decoding.
    #[inline]
    pub fn encodes_with(self) -> Backend {
        match self {
            Backend::Neon => Backend::Scalar,
            other => other,
        }
    }

    /// Short lowercase name, e.g. for logs and benchmark labels.
    pub fn name(self) -> &'static str {
        match self {
            Backend::Scalar => "scalar",
            Backend::Avx2 => "avx2",
            Backend::Neon => "neon",
        }
    }

    #[inline]
    pub(crate) fn or_scalar(self) -> Backend {
        if self == Backend::Scalar || self.is_available() {
            self
        } else {
            Backend::Scalar
        }
    }

    fn from_u8(value: u8) -> Option<Backend> {
        match value {
            1 => Some(Backend::Scalar),
            2 => Some(Backend::Avx2),
            3 => Some(Backend::Neon),
            _ => None,
        }
    }
}

impl core::fmt::Display for Backend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

fn probe() -> Backend {
    if neon_supported() {
        Backend::Neon
    } else if avx2_supported() {
        Backend::Avx2
    } else {
        Backend::Scalar
    }
}

#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
fn avx2_supported() -> bool {
    #[cfg(feature = "std")]
    {
        std::is_x86_feature_detected!("avx2")
    }
    #[cfg(not(feature = "std"))]
    {
        cfg!(target_feature = "avx2")
    }
}

#[cfg(not(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64"))))]
fn avx2_supported() -> bool {
    false
}

#[cfg(all(feature = "simd", target_arch = "aarch64"))]
fn neon_supported() -> bool {
    #[cfg(feature = "std")]
    {
        std::arch::is_aarch64_feature_detected!("neon")
    }
    #[cfg(not(feature = "std"))]
    {
        cfg!(target_feature = "neon")
    }
}

#[cfg(not(all(feature = "simd", target_arch = "aarch64")))]
fn neon_supported() -> bool {
    false
}
