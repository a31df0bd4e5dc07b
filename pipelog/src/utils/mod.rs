use std::net::{Ipv4Addr, UdpSocket};

pub fn current_thread_id() -> u64 {
  use std::collections::hash_map::DefaultHasher;
  use std::hash::{Hash, Hasher};
  let mut hasher = DefaultHasher::new();
  std::thread::current().id().hash(&mut hasher);
  hasher.finish()
}

pub fn current_thread_name() -> Option<String> {
  std::thread::current().name().map(str::to_string)
}

pub fn hostname() -> String {
  gethostname::gethostname().to_string_lossy().into_owned()
}

/// Address of the interface the OS would route outbound traffic through.
///
/// Connecting a UDP socket sends nothing; it only asks the kernel to pick a
/// source address.
pub fn local_ipv4() -> Option<Ipv4Addr> {
  let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
  socket.connect((Ipv4Addr::new(192, 0, 2, 1), 9)).ok()?;
  match socket.local_addr().ok()?.ip() {
    std::net::IpAddr::V4(ip) if !ip.is_unspecified() => Some(ip),
    _ => None,
  }
}
