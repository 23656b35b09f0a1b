use crate::error::NotFoundError;
use crate::types::{Circuit, Driver};

const fn driver(id: &'static str, display_name: &'static str) -> Driver {
    Driver { id, display_name }
}

const fn circuit(name: &'static str, image_key: &'static str, lap_count: u32) -> Circuit {
    Circuit { name, image_key, lap_count }
}

pub const DRIVERS: [Driver; 20] = [
    driver("VER", "Max Verstappen"),
    driver("PER", "Sergio Pérez"),
    driver("HAM", "Lewis Hamilton"),
    driver("RUS", "George Russell"),
    driver("LEC", "Charles Leclerc"),
    driver("SAI", "Carlos Sainz"),
    driver("NOR", "Lando Norris"),
    driver("PIA", "Oscar Piastri"),
    driver("ALO", "Fernando Alonso"),
    driver("STR", "Lance Stroll"),
    driver("OCO", "Esteban Ocon"),
    driver("GAS", "Pierre Gasly"),
    driver("ALB", "Alex Albon"),
    driver("SAR", "Logan Sargeant"),
    driver("TSU", "Yuki Tsunoda"),
    driver("RIC", "Daniel Ricciardo"),
    driver("BOT", "Valtteri Bottas"),
    driver("ZHO", "Zhou Guanyu"),
    driver("HUL", "Nico Hülkenberg"),
    driver("MAG", "Kevin Magnussen"),
];

pub const CIRCUITS: [Circuit; 24] = [
    circuit("Bahrain", "bahrain.png", 57),
    circuit("Saudi Arabia (Jeddah)", "jeddah.png", 50),
    circuit("Australia (Albert Park)", "albert_park.png", 58),
    circuit("Japan (Suzuka)", "suzuka.png", 53),
    circuit("China (Shanghai)", "shanghai.png", 56),
    circuit("Miami", "miami.png", 57),
    circuit("Emilia Romagna (Imola)", "imola.png", 63),
    circuit("Monaco", "monaco.png", 78),
    circuit("Canada (Montreal)", "montreal.png", 70),
    circuit("Spain (Barcelona)", "barcelona.png", 66),
    circuit("Austria (Spielberg)", "spielberg.png", 71),
    circuit("Great Britain (Silverstone)", "silverstone.png", 52),
    circuit("Hungary (Budapest)", "hungary.png", 70),
    circuit("Belgium (Spa)", "spa.png", 44),
    circuit("Netherlands (Zandvoort)", "zandvoort.png", 72),
    circuit("Italy (Monza)", "monza.png", 53),
    circuit("Azerbaijan (Baku)", "baku.png", 51),
    circuit("Singapore", "singapore.png", 62),
    circuit("United States (COTA)", "austin.png", 56),
    circuit("Mexico", "mexico.png", 71),
    circuit("Brazil (Interlagos)", "interlagos.png", 71),
    circuit("Las Vegas", "vegas.png", 50),
    circuit("Qatar (Lusail)", "lusail.png", 57),
    circuit("Abu Dhabi (Yas Marina)", "yas_marina.png", 58),
];

pub fn drivers() -> &'static [Driver] {
    &DRIVERS
}

pub fn circuits() -> &'static [Circuit] {
    &CIRCUITS
}

pub fn lookup_driver(id: &str) -> Result<Driver, NotFoundError> {
    DRIVERS
        .iter()
        .copied()
        .find(|d| d.id == id)
        .ok_or_else(|| NotFoundError { kind: "driver", key: id.to_string() })
}

pub fn lookup_circuit(name: &str) -> Result<Circuit, NotFoundError> {
    CIRCUITS
        .iter()
        .copied()
        .find(|c| c.name == name)
        .ok_or_else(|| NotFoundError { kind: "circuit", key: name.to_string() })
}
