//! Service name to port mapping

const SERVICES: &[(&str, u16)] = &[
    ("smtp", 25),
    ("http", 80),
    ("www", 80),
    ("pop3", 110),
    ("nntp", 119),
    ("imap", 143),
    ("imap2", 143),
    ("https", 443),
    ("smtps", 465),
    ("submissions", 465),
    ("nntps", 563),
    ("submission", 587),
    ("imaps", 993),
    ("pop3s", 995),
    ("socks", 1080),
    ("http-alt", 8080),
];

/// Port registered for a well-known service name.
pub fn service_port(name: &str) -> Option<u16> {
    SERVICES
        .iter()
        .find(|(service, _)| service.eq_ignore_ascii_case(name))
        .map(|&(_, port)| port)
}

/// Resolve a port field: service table first, then a decimal in 1..=65535.
pub fn lookup_port(port: &str) -> Option<u16> {
    if let Some(port) = service_port(port) {
        return Some(port);
    }
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match port.parse::<u16>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}
