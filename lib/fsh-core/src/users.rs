//! User and group database lookups.
//!
//! Lookups go through the re-entrant `get*_r` family so that no static
//! libc buffers are shared between calls.

use std::ffi::{CStr, CString};
use std::{mem, ptr};

const INITIAL_BUFFER_LEN: usize = 1024;
const MAX_BUFFER_LEN: usize = 1 << 20;

/// Name of the user owning `uid`, or the decimal id when the lookup fails.
pub fn owner_name(uid: u32) -> String {
    user_name(uid).unwrap_or_else(|| uid.to_string())
}

/// Name of the group `gid`, or the decimal id when the lookup fails.
pub fn group_name(gid: u32) -> String {
    lookup(
        |grp: &mut libc::group, buf: &mut [libc::c_char], result: &mut *mut libc::group| unsafe {
            libc::getgrgid_r(gid, grp, buf.as_mut_ptr(), buf.len(), result)
        },
        |grp: &libc::group| unsafe { CStr::from_ptr(grp.gr_name) }.to_string_lossy().into_owned(),
    )
    .unwrap_or_else(|| gid.to_string())
}

/// The uid of the user called `name`, if there is one.
pub fn lookup_uid(name: &str) -> Option<u32> {
    let name = CString::new(name).ok()?;
    lookup(
        |pwd: &mut libc::passwd, buf: &mut [libc::c_char], result: &mut *mut libc::passwd| unsafe {
            libc::getpwnam_r(name.as_ptr(), pwd, buf.as_mut_ptr(), buf.len(), result)
        },
        |pwd: &libc::passwd| pwd.pw_uid,
    )
}

fn user_name(uid: u32) -> Option<String> {
    lookup(
        |pwd: &mut libc::passwd, buf: &mut [libc::c_char], result: &mut *mut libc::passwd| unsafe {
            libc::getpwuid_r(uid, pwd, buf.as_mut_ptr(), buf.len(), result)
        },
        |pwd: &libc::passwd| unsafe { CStr::from_ptr(pwd.pw_name) }.to_string_lossy().into_owned(),
    )
}

/// Run one `get*_r` call, doubling the scratch buffer while libc reports
/// `ERANGE`. `read` runs while the buffer backing the entry is still alive.
fn lookup<E, T>(
    mut call: impl FnMut(&mut E, &mut [libc::c_char], &mut *mut E) -> libc::c_int,
    read: impl FnOnce(&E) -> T,
) -> Option<T> {
    let mut buf = vec![0 as libc::c_char; INITIAL_BUFFER_LEN];
    loop {
        // SAFETY: only instantiated with the plain C structs `passwd` and `group`.
        let mut entry: E = unsafe { mem::zeroed() };
        let mut result: *mut E = ptr::null_mut();
        let rc = call(&mut entry, buf.as_mut_slice(), &mut result);

        if rc == libc::ERANGE && buf.len() < MAX_BUFFER_LEN {
            let len = buf.len() * 2;
            buf.resize(len, 0);
            continue;
        }
        if rc != 0 || result.is_null() {
            return None;
        }
        return Some(read(&entry));
    }
}
