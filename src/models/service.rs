use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Service {
    pub id: &'static str,
    pub name: &'static str,
    /// Whole CZK.
    pub price: u32,
    pub duration: &'static str,
}

pub static SERVICES: [Service; 6] = [
    Service {
        id: "1",
        name: "Klasická Manikúra",
        price: 650,
        duration: "45 min",
    },
    Service {
        id: "2",
        name: "Zpevnění (BIAB)",
        price: 950,
        duration: "75 min",
    },
    Service {
        id: "3",
        name: "Spa Pedikúra",
        price: 1200,
        duration: "90 min",
    },
    Service {
        id: "4",
        name: "Gelová Modeláž",
        price: 1600,
        duration: "120 min",
    },
    Service {
        id: "5",
        name: "Nail Art & Zdobení",
        price: 150,
        duration: "za nehet",
    },
    Service {
        id: "6",
        name: "Japonská Manikúra",
        price: 700,
        duration: "60 min",
    },
];

pub static TIME_SLOTS: [&str; 7] = [
    "09:00", "10:00", "11:00", "13:00", "14:30", "16:00", "17:30",
];

impl Service {
    pub fn find(id: &str) -> Option<&'static Service> {
        SERVICES.iter().find(|s| s.id == id)
    }
}

pub fn is_time_slot(label: &str) -> bool {
    TIME_SLOTS.contains(&label)
}
