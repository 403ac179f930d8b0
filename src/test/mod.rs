
use crate::ifmon::{class, dl, inet, inet6, subclass, vendor};
use crate::{Device, Error, EventMonitor, NetworkEvent, Tun};
use nix::errno::Errno;
use nix::sys::socket::{socketpair, AddressFamily, SockFlag, SockType};
use nix::unistd::{pipe, write};
use packets::{kernel_event, PacketFactory};
use signals::Interrupter;
use std::os::fd::OwnedFd;
use std::thread;
use std::time::Duration;

fn datagram_pair() -> (OwnedFd, OwnedFd) {
    socketpair(AddressFamily::Unix, SockType::Datagram, None, SockFlag::empty()).unwrap()
}

/// Two tun handles wired back to back, standing in for the kernel side.
fn tun_pair() -> (Tun, Tun) {
    let (a, b) = datagram_pair();
    (
        Tun::from_fd(a, "tun7".into(), Duration::from_secs(1)),
        Tun::from_fd(b, "tun8".into(), Duration::from_secs(1)),
    )
}

#[cfg(target_os = "linux")]
fn forward<D: Device>(from: &D, to: &D) -> std::io::Result<usize> {
    let mut buf = [0u8; 1504];
    let n = from.recv(&mut buf)?;
    to.send(&buf[..n])
}

#[cfg(target_os = "linux")]
#[test]
fn test_packets_cross_unchanged() {
    let (local, kernel) = tun_pair();
    let packets = vec![
        PacketFactory::udp4("10.0.0.2", "10.0.0.1", 5353, 53, b"query"),
        PacketFactory::udp6("fd00::2", "fd00::1", 4000, 4001, &[7u8; 1200]),
        PacketFactory::ping("192.168.192.1", "192.168.192.254", 1),
    ];

    for packet in &packets {
        assert_eq!(local.write(packet).unwrap(), packet.len());
        let mut buf = [0u8; 1500];
        let n = kernel.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], &packet[..]);
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_device_trait_forwards_packets() {
    let (a, b) = tun_pair();
    let (c, d) = tun_pair();

    let packet = PacketFactory::udp4("10.0.0.2", "10.0.0.1", 1234, 80, b"hello\n");
    b.send(&packet).unwrap();

    // a -> c hop, as a consumer loop would do.
    assert_eq!(forward(&a, &c).unwrap(), packet.len());

    let mut buf = [0u8; 1500];
    let n = d.recv(&mut buf).unwrap();
    assert_eq!(&buf[..n], &packet[..]);
}

#[test]
fn test_write_times_out_on_full_device() {
    let (_rx, tx) = pipe().unwrap();
    let tun = Tun::from_fd(tx, "tun9".into(), Duration::from_millis(50));
    tun.set_nonblocking(true).unwrap();

    // Larger than any pipe buffer, and nobody drains it.
    let packet = vec![0u8; 4 * 1024 * 1024];
    match tun.write(&packet) {
        Err(Error::Timeout(t)) => assert_eq!(t, Duration::from_millis(50)),
        other => panic!("expected timeout, got {:?}", other),
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_nonblocking_read_with_nothing_queued() {
    let (tun, _kernel) = tun_pair();
    tun.set_nonblocking(true).unwrap();
    let mut buf = [0u8; 1500];
    assert!(matches!(tun.read(&mut buf), Err(Error::Io(Errno::EAGAIN))));

    tun.set_nonblocking(false).unwrap();
}

#[test]
fn test_write_timeout_is_adjustable() {
    let (mut tun, _kernel) = tun_pair();
    assert_eq!(tun.write_timeout(), Duration::from_secs(1));
    tun.set_write_timeout(Duration::from_secs(60));
    assert_eq!(tun.write_timeout(), Duration::from_secs(60));
    assert_eq!(tun.name(), "tun7");
}

#[test]
fn test_close_releases_descriptor() {
    let (tun, kernel) = tun_pair();
    tun.close().unwrap();

    // The peer sees the other end gone.
    let buf = [0u8; 16];
    let err = write(&kernel, &buf).unwrap_err();
    assert!(matches!(err, Errno::ECONNREFUSED | Errno::ENOTCONN | Errno::EPIPE));
}

#[test]
fn test_monitor_only_returns_network_events() {
    let (kernel, monitor) = datagram_pair();
    let monitor = EventMonitor::from_fd(monitor);

    write(&kernel, &kernel_event(vendor::APPLE, class::SYSTEM, 1, 1)).unwrap();
    write(&kernel, &kernel_event(vendor::APPLE, class::IOKIT, 0, 3)).unwrap();
    write(&kernel, &kernel_event(vendor::APPLE, class::NETWORK, subclass::DL, dl::LINK_ON)).unwrap();

    let event = monitor.wait().unwrap();
    assert_eq!(event, NetworkEvent::new(class::NETWORK, subclass::DL, dl::LINK_ON));
}

#[test]
fn test_monitor_yields_one_event_per_wait() {
    let (kernel, monitor) = datagram_pair();
    let monitor = EventMonitor::from_fd(monitor);

    write(&kernel, &kernel_event(vendor::APPLE, class::NETWORK, subclass::DL, dl::LINK_OFF)).unwrap();
    write(&kernel, &kernel_event(vendor::APPLE, class::NETWORK, subclass::DL, dl::LINK_ON)).unwrap();

    assert_eq!(monitor.wait().unwrap().code, dl::LINK_OFF);
    assert_eq!(monitor.wait().unwrap().code, dl::LINK_ON);
}

#[test]
fn test_monitor_waits_for_address_change() {
    let (kernel, monitor) = datagram_pair();
    let monitor = EventMonitor::from_fd(monitor);

    write(&kernel, &kernel_event(vendor::APPLE, class::NETWORK, subclass::DL, dl::LINK_ON)).unwrap();
    write(&kernel, &kernel_event(vendor::APPLE, class::NETWORK, subclass::INET, inet::SIFNETMASK)).unwrap();
    write(&kernel, &kernel_event(vendor::APPLE, class::NETWORK, subclass::INET6, inet6::NEW_USER_ADDR)).unwrap();

    let event = monitor.wait_address_change().unwrap();
    assert_eq!(event.subclass, subclass::INET6);
    assert_eq!(event.code, inet6::NEW_USER_ADDR);
    assert_eq!(event.to_string(), "inet6:NEW_USER_ADDR");
}

#[test]
fn test_monitor_wait_survives_signals() {
    let (kernel, monitor) = datagram_pair();
    let monitor = EventMonitor::from_fd(monitor);
    let publisher = thread::spawn(move || {
        thread::sleep(Duration::from_millis(200));
        write(&kernel, &kernel_event(vendor::APPLE, class::NETWORK, subclass::INET, inet::NEW_ADDR)).unwrap();
        kernel
    });

    let signals = Interrupter::start(Duration::from_millis(25));
    let event = monitor.wait().unwrap();
    assert!(signals.stop() > 0);

    assert_eq!(event, NetworkEvent::new(class::NETWORK, subclass::INET, inet::NEW_ADDR));
    publisher.join().unwrap();
}

#[test]
fn test_monitor_rejects_truncated_message() {
    let (kernel, monitor) = datagram_pair();
    let monitor = EventMonitor::from_fd(monitor);

    write(&kernel, &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    assert!(matches!(monitor.wait(), Err(Error::Truncated(8))));
}

#[test]
fn test_monitor_receive_failure() {
    let (_rx, tx) = pipe().unwrap();
    let monitor = EventMonitor::from_fd(tx);
    assert!(matches!(monitor.wait(), Err(Error::Io(Errno::ENOTSOCK))));
}

#[test]
fn test_monitor_close() {
    let (_kernel, monitor) = datagram_pair();
    EventMonitor::from_fd(monitor).close().unwrap();
}

#[cfg(not(target_os = "macos"))]
#[test]
fn test_monitor_unsupported() {
    assert!(matches!(EventMonitor::create(), Err(Error::Unsupported)));
}
