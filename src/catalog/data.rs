//! Built-in reward partners and their German store locations

use super::{PartnerRecord, StoreLocation};
use crate::core::geo::LatLng;

const PARTNERS: &[(&str, &str, u32)] = &[
    ("Starbucks", "Coffee", 1200),
    ("McDonald's", "Fast Food", 850),
    ("Target", "Retail", 650),
    ("Best Buy", "Electronics", 420),
    ("Walmart", "Supermarket", 980),
    ("CVS Pharmacy", "Pharmacy", 750),
];

// (id, lat, lng, display name, city, partner, address)
const STORES: &[(u32, f64, f64, &str, &str, &str, &str)] = &[
    (1, 52.5200, 13.4050, "Alexanderplatz", "Berlin", "Starbucks", "Alexanderstraße 3, 10178 Berlin"),
    (2, 52.5163, 13.3777, "Brandenburg Gate", "Berlin", "McDonald's", "Pariser Platz, 10117 Berlin"),
    (3, 52.5076, 13.3904, "Potsdamer Platz", "Berlin", "Target", "Potsdamer Platz 1, 10785 Berlin"),
    (4, 48.1372, 11.5756, "Marienplatz", "Munich", "Starbucks", "Marienplatz 8, 80331 München"),
    (5, 48.1402, 11.5600, "Karlsplatz (Stachus)", "Munich", "McDonald's", "Karlsplatz 1, 80335 München"),
    (6, 53.5511, 9.9937, "Jungfernstieg", "Hamburg", "Starbucks", "Jungfernstieg 24, 20354 Hamburg"),
    (7, 53.5438, 9.9861, "Speicherstadt", "Hamburg", "Best Buy", "Am Sandtorkai 36, 20457 Hamburg"),
    (8, 50.9413, 6.9583, "Cologne Cathedral", "Cologne", "Walmart", "Domkloster 4, 50667 Köln"),
    (9, 50.9364, 6.9528, "Hohe Straße", "Cologne", "McDonald's", "Hohe Str. 68, 50667 Köln"),
    (10, 50.1109, 8.6821, "Römerberg", "Frankfurt", "CVS Pharmacy", "Römerberg 27, 60311 Frankfurt am Main"),
    (11, 50.1126, 8.6831, "Zeil", "Frankfurt", "Target", "Zeil 106, 60313 Frankfurt am Main"),
    (12, 48.7758, 9.1829, "Königstraße", "Stuttgart", "Starbucks", "Königstraße 12, 70173 Stuttgart"),
    (13, 51.2277, 6.7735, "Königsallee", "Düsseldorf", "Best Buy", "Königsallee 26, 40212 Düsseldorf"),
    (14, 51.3397, 12.3731, "Marktplatz", "Leipzig", "Walmart", "Markt 1, 04109 Leipzig"),
    (15, 51.0504, 13.7373, "Altmarkt", "Dresden", "McDonald's", "Altmarkt 10, 01067 Dresden"),
    (16, 49.4521, 11.0767, "Hauptmarkt", "Nuremberg", "Starbucks", "Hauptmarkt 14, 90403 Nürnberg"),
    (17, 52.3759, 9.7320, "Ernst-August-Platz", "Hannover", "CVS Pharmacy", "Ernst-August-Platz 2, 30159 Hannover"),
    (18, 53.0793, 8.8017, "Domshof", "Bremen", "Target", "Domshof 5, 28195 Bremen"),
    (19, 51.5136, 7.4653, "Westenhellweg", "Dortmund", "Best Buy", "Westenhellweg 40, 44137 Dortmund"),
    (20, 49.4875, 8.4660, "Planken", "Mannheim", "Starbucks", "P7 12, 68161 Mannheim"),
    (21, 50.7374, 7.0982, "Münsterplatz", "Bonn", "McDonald's", "Münsterplatz 6, 53111 Bonn"),
    (22, 54.3233, 10.1228, "Holstenstraße", "Kiel", "Walmart", "Holstenstraße 30, 24103 Kiel"),
];

pub(super) fn partners() -> Vec<PartnerRecord> {
    PARTNERS
        .iter()
        .map(|&(name, category, store_count)| PartnerRecord::new(name, category, store_count))
        .collect()
}

pub(super) fn stores() -> Vec<StoreLocation> {
    STORES
        .iter()
        .map(
            |&(id, lat, lng, display_name, city, partner_name, address)| StoreLocation {
                id,
                coordinate: LatLng::new(lat, lng),
                display_name: display_name.to_string(),
                city: city.to_string(),
                partner_name: partner_name.to_string(),
                address: address.to_string(),
            },
        )
        .collect()
}
