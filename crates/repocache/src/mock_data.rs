use crate::models::Domain;

const HOSTS: &[(&str, &str)] = &[
    ("example.com", "en-US"),
    ("example.dk", "da-DK"),
    ("example.de", "de-DE"),
    ("example.fr", "fr-FR"),
    ("example.es", "es-ES"),
];

/// Generates transient mock domains for demonstration purposes.
///
/// Hosts cycle through a fixed list; every third domain after the first
/// cycle is a wildcard domain bound to its content root.
pub fn generate_mock_domains(count: usize) -> Vec<Domain> {
    (0..count)
        .map(|i| {
            let (host, culture) = HOSTS[i % HOSTS.len()];
            let root = 1000 + (i / HOSTS.len()) as i32;
            let name = match i / HOSTS.len() {
                0 => host.to_string(),
                _ if i % 3 == 0 => format!("*{root}"),
                n => format!("site{n}.{host}"),
            };
            Domain::new(name)
                .with_root_content(root)
                .with_language(culture)
        })
        .collect()
}
