//! A small online store: customers and the items they want to buy.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub name: String,
    pub want_to_buy: Vec<Item>,
}

fn customer(name: &str, want_to_buy: &[&str]) -> Customer {
    Customer {
        name: name.to_owned(),
        want_to_buy: want_to_buy
            .iter()
            .map(|&item| Item {
                name: item.to_owned(),
            })
            .collect(),
    }
}

/// The customers, in registration order.
pub fn customers() -> Vec<Customer> {
    vec![
        customer("Joe", &["small table", "plate", "fork"]),
        customer("Steven", &["ice cream", "earphone", "cable"]),
        customer("Patrick", &["onion", "ice cream"]),
        customer("Diana", &["thermos", "cable", "notebook"]),
        customer("Chris", &["plane", "chair"]),
        customer("Kathy", &["ice tea"]),
        customer("Alice", &["desk", "pants"]),
        customer("Andrew", &["hat", "tea"]),
        customer("Martin", &["plate", "fork", "bag"]),
        customer("Amy", &["onion", "cookie"]),
    ]
}
