//! Thread-to-CPU pinning.
//!
//! Pinning is a performance hint: every operation reports failure through its
//! return value and never aborts the caller. Targets without a per-thread
//! affinity API get no-op fallbacks that always report "not pinned".

/// Affinity operations on the calling thread.
pub trait Affinity {
    /// Restricts the calling thread to `cpu`. No retry on failure.
    fn pin_current_thread_to(&self, cpu: usize) -> bool;

    /// Where the caller runs right now. Unstable unless the thread is pinned.
    fn current_logical_cpu(&self) -> Option<usize>;

    /// True when the thread may run on fewer than all configured CPUs.
    fn is_current_thread_pinned(&self) -> bool;
}

/// The operating system's affinity API.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAffinity;

impl Affinity for SystemAffinity {
    fn pin_current_thread_to(&self, cpu: usize) -> bool {
        pin_current_thread_to(cpu)
    }

    fn current_logical_cpu(&self) -> Option<usize> {
        current_logical_cpu()
    }

    fn is_current_thread_pinned(&self) -> bool {
        is_current_thread_pinned()
    }
}

/// Where a worker ended up after its pin attempt.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub cpu: Option<usize>,
    pub pinned: bool,
}

impl Placement {
    pub fn of<A: Affinity + ?Sized>(affinity: &A) -> Self {
        Placement {
            cpu: affinity.current_logical_cpu(),
            pinned: affinity.is_current_thread_pinned(),
        }
    }
}

#[cfg(target_os = "linux")]
mod linux {
    use std::mem;

    fn cpu_set_capacity() -> usize {
        libc::CPU_SETSIZE as usize
    }

    pub fn pin_current_thread_to(cpu: usize) -> bool {
        // CPU_SET indexes a fixed-size mask.
        if cpu >= cpu_set_capacity() {
            return false;
        }
        unsafe {
            let mut set: libc::cpu_set_t = mem::zeroed();
            libc::CPU_ZERO(&mut set);
            libc::CPU_SET(cpu, &mut set);
            libc::pthread_setaffinity_np(
                libc::pthread_self(),
                mem::size_of::<libc::cpu_set_t>(),
                &set,
            ) == 0
        }
    }

    pub fn current_logical_cpu() -> Option<usize> {
        let cpu = unsafe { libc::sched_getcpu() };
        usize::try_from(cpu).ok()
    }

    pub fn is_current_thread_pinned() -> bool {
        let allowed = unsafe {
            let mut set: libc::cpu_set_t = mem::zeroed();
            let rc = libc::pthread_getaffinity_np(
                libc::pthread_self(),
                mem::size_of::<libc::cpu_set_t>(),
                &mut set,
            );
            if rc != 0 {
                return false;
            }
            libc::CPU_COUNT(&set)
        };
        match usize::try_from(allowed) {
            Ok(allowed) => allowed < crate::topology::num_logical_cpus_configured(),
            Err(_) => false,
        }
    }
}

#[cfg(target_os = "linux")]
pub use linux::{current_logical_cpu, is_current_thread_pinned, pin_current_thread_to};

#[cfg(not(target_os = "linux"))]
pub fn pin_current_thread_to(_cpu: usize) -> bool {
    false
}

#[cfg(not(target_os = "linux"))]
pub fn current_logical_cpu() -> Option<usize> {
    None
}

#[cfg(not(target_os = "linux"))]
pub fn is_current_thread_pinned() -> bool {
    false
}
