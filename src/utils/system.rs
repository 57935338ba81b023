const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Resident set size of the current process in bytes, when the platform
/// exposes it.
#[inline]
pub fn resident_set_size_bytes() -> Option<u64> {
    #[cfg(target_os = "linux")]
    {
        linux_rss_bytes()
    }

    #[cfg(target_os = "macos")]
    {
        macos_rss_bytes()
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

pub fn resident_set_size_gb() -> Option<f64> {
    resident_set_size_bytes().map(|b| b as f64 / BYTES_PER_GB)
}

#[cfg(target_os = "linux")]
fn linux_rss_bytes() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_rss_bytes(&status)
}

#[cfg(target_os = "linux")]
fn parse_vm_rss_bytes(status: &str) -> Option<u64> {
    status
        .lines()
        .filter_map(|line| line.strip_prefix("VmRSS:"))
        .find_map(|rest| rest.split_whitespace().find_map(|t| t.parse::<u64>().ok()))
        .map(|kb| kb * 1024)
}

#[cfg(target_os = "macos")]
fn macos_rss_bytes() -> Option<u64> {
    use libc::{c_int, c_void, kern_return_t, mach_msg_type_number_t, mach_port_t, time_value_t};
    use std::mem::{size_of, zeroed};

    #[repr(C)]
    #[allow(non_camel_case_types)]
    struct mach_task_basic_info {
        virtual_size: u64,
        resident_size: u64,
        resident_size_max: u64,
        user_time: time_value_t,
        system_time: time_value_t,
        policy: i32,
        suspend_count: i32,
    }

    unsafe extern "C" {
        fn mach_task_self() -> mach_port_t;
        fn task_info(
            target_task: mach_port_t,
            flavor: c_int,
            task_info_out: *mut c_void,
            task_info_out_count: *mut mach_msg_type_number_t,
        ) -> kern_return_t;
    }

    const MACH_TASK_BASIC_INFO: c_int = 20;
    const MACH_TASK_BASIC_INFO_COUNT: mach_msg_type_number_t =
        (size_of::<mach_task_basic_info>() / size_of::<u32>()) as _;

    unsafe {
        let mut info: mach_task_basic_info = zeroed();
        let mut count = MACH_TASK_BASIC_INFO_COUNT;
        let kr = task_info(
            mach_task_self(),
            MACH_TASK_BASIC_INFO,
            &mut info as *mut _ as *mut c_void,
            &mut count,
        );
        (kr == 0).then_some(info.resident_size)
    }
}

#[cfg(test)]
mod tests {
    #[cfg(target_os = "linux")]
    mod linux {
        use super::super::{parse_vm_rss_bytes, resident_set_size_gb};

        #[test]
        fn test_parses_vm_rss_in_kilobytes() {
            let s = "Name:\tghvfdt\nVmSize:\t  999 kB\nVmRSS:\t  2048 kB\nThreads: 1\n";
            assert_eq!(parse_vm_rss_bytes(s), Some(2048 * 1024));
        }

        #[test]
        fn test_missing_vm_rss_gives_none() {
            assert!(parse_vm_rss_bytes("Name:\tghvfdt\n").is_none());
            assert!(parse_vm_rss_bytes("VmRSS:\t kB").is_none());
        }

        #[test]
        fn test_current_process_reports_positive_rss() {
            let gb = resident_set_size_gb().unwrap();
            assert!(gb > 0.0);
        }
    }

    #[cfg(target_os = "macos")]
    #[test]
    fn test_macos_current_rss_smoke() {
        let v = super::resident_set_size_bytes();
        assert!(v.is_some_and(|b| b > 0));
    }
}
