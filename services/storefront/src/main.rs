//! Storefront command-line front end
//!
//! # Usage
//!
//! ```bash
//! storefront products --search мышь
//! storefront login buyer
//! storefront add-to-cart 101 --qty 2
//! storefront cart
//! storefront checkout
//! storefront orders
//! ```
//!
//! Every command acts as the user stored in the session, so `login` or
//! `register` comes first.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use common::{KeyValueStore, open_store};
use tracing::info;
use tracing_subscriber::EnvFilter;

use storefront::{
    AppConfig, NewProduct, Order, Product, ProductId, Profile, ProfileUpdate, Registration, Role,
    Store, User, UserId, format_price,
};

#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about = "Demo storefront: catalog, cart and checkout")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the document if it does not exist yet
    Init,
    /// List the catalog
    Products {
        /// Only products sold by this user id
        #[arg(long)]
        seller: Option<u64>,
        /// Case-insensitive text to look for in names and descriptions
        #[arg(long)]
        search: Option<String>,
    },
    /// Log in by username
    Login { username: String },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Create an account and log in
    Register {
        username: String,
        /// `user` or `company`
        #[arg(long, default_value = "user")]
        role: Role,
        /// Display name for companies, defaults to the username
        #[arg(long, default_value = "")]
        company_name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Edit the logged-in user's profile. Omitted fields keep their value.
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        desc: Option<String>,
    },
    /// Put a product on sale (companies only)
    AddProduct {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: String,
        #[arg(long, default_value = "")]
        desc: String,
        /// Image URL, a placeholder is generated when omitted
        #[arg(long, default_value = "")]
        image: String,
    },
    /// Delete one of your products (companies only)
    RemoveProduct { id: u64 },
    /// Show the cart with current prices
    Cart,
    /// Add a product to the cart (buyers only)
    AddToCart {
        id: u64,
        #[arg(long, default_value_t = 1)]
        qty: u32,
    },
    /// Remove a product from the cart
    RemoveFromCart { id: u64 },
    /// Place an order for everything in the cart
    Checkout,
    /// List your orders, newest first
    Orders,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Each command is its own process, so a memory backend would forget the
    // session and carts between commands.
    if !config.storage.backend.is_persistent() {
        bail!("The memory storage backend does not persist between commands, use `file` or `redis`");
    }

    let storage = open_store(&config.storage)?;
    let mut store = Store::open(storage, config.keys.clone())?;
    if store.initialize()? {
        info!("Created seed document");
    }

    run(&mut store, cli.command)
}

fn run<S: KeyValueStore>(store: &mut Store<S>, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            println!(
                "{} users, {} products",
                store.list_users().len(),
                store.list_products().len()
            );
        }
        Commands::Products { seller, search } => {
            let mut products: Vec<&Product> = match search {
                Some(search) => store.search_products(&search),
                None => store.list_products().iter().collect(),
            };
            if let Some(seller) = seller {
                products.retain(|p| p.seller_id == UserId::new(seller));
            }
            if products.is_empty() {
                println!("No products found");
            }
            for product in products {
                print_product(store, product);
            }
        }
        Commands::Login { username } => {
            let user = store.session().login(&username)?;
            println!("Logged in as {} ({})", user.username, user.role());
        }
        Commands::Logout => {
            store.session().logout()?;
            println!("Logged out");
        }
        Commands::Whoami => match store.session().current_user()? {
            Some(user) => print_user(&user),
            None => println!("Not logged in"),
        },
        Commands::Register {
            username,
            role,
            company_name,
            email,
            phone,
        } => {
            let registration = Registration {
                username,
                role,
                company_name,
                email,
                phone,
            };
            let user = store.session().register(registration)?;
            println!("Registered and logged in as {} (id {})", user.username, user.id);
        }
        Commands::Profile {
            name,
            email,
            phone,
            desc,
        } => {
            let user = current_user(store)?;
            let current_desc = match &user.profile {
                Profile::Company { desc, .. } => desc.clone(),
                Profile::User { .. } => String::new(),
            };
            let current_name = match user.role() {
                Role::Company => user.display_name().to_string(),
                Role::User => user.username.clone(),
            };
            let update = ProfileUpdate {
                name: name.unwrap_or(current_name),
                email: email.unwrap_or_else(|| user.email.clone()),
                phone: phone.unwrap_or_else(|| user.phone.clone()),
                desc: desc.unwrap_or(current_desc),
            };
            let user = store.update_profile(user.id, update)?;
            print_user(&user);
        }
        Commands::AddProduct {
            name,
            price,
            desc,
            image,
        } => {
            let user = current_user(store)?;
            let product = store.add_product(
                user.id,
                NewProduct {
                    name,
                    price,
                    desc,
                    image,
                },
            )?;
            println!("Added product #{}", product.id);
            print_product(store, &product);
        }
        Commands::RemoveProduct { id } => {
            let user = current_user(store)?;
            let product = store.remove_product(user.id, ProductId::new(id))?;
            println!("Removed {} (#{})", product.name, product.id);
        }
        Commands::Cart => {
            let user = current_user(store)?;
            let summary = store.cart_summary(user.id)?;
            if summary.lines.is_empty() {
                println!("Cart is empty");
                return Ok(());
            }
            for line in &summary.lines {
                println!(
                    "#{:<15} {:<30} {:>14} x {:<3} = {}",
                    line.product.id,
                    line.product.name,
                    format_price(line.product.price),
                    line.qty,
                    format_price(line.subtotal)
                );
            }
            println!("Total: {}", format_price(summary.total));
        }
        Commands::AddToCart { id, qty } => {
            let user = current_user(store)?;
            let cart = store.add_to_cart(user.id, ProductId::new(id), qty)?;
            println!(
                "Added to cart, now {} x #{}",
                cart.quantity_of(ProductId::new(id)),
                id
            );
        }
        Commands::RemoveFromCart { id } => {
            let user = current_user(store)?;
            let cart = store.remove_from_cart(user.id, ProductId::new(id))?;
            println!("Cart has {} lines", cart.items.len());
        }
        Commands::Checkout => {
            let user = current_user(store)?;
            let order = store.checkout(user.id)?;
            println!("Order placed");
            print_order(&order);
        }
        Commands::Orders => {
            let user = current_user(store)?;
            let orders = store.orders_for_user(user.id);
            if orders.is_empty() {
                println!("No orders");
            }
            for order in orders {
                print_order(order);
            }
        }
    }
    Ok(())
}

fn current_user<S: KeyValueStore>(store: &mut Store<S>) -> Result<User> {
    match store.session().current_user()? {
        Some(user) => Ok(user),
        None => bail!("Not logged in, run `storefront login <username>` first"),
    }
}

fn print_product<S: KeyValueStore>(store: &Store<S>, product: &Product) {
    let seller = store.seller_name(product.seller_id).unwrap_or("Компания");
    println!(
        "#{:<15} {:<30} {:>14}  {}",
        product.id,
        product.name,
        format_price(product.price),
        seller
    );
    if !product.desc.is_empty() {
        println!("                 {}", product.desc);
    }
}

fn print_user(user: &User) {
    println!("{} (id {}, {})", user.username, user.id, user.role());
    if user.role() == Role::Company {
        println!("  company: {}", user.display_name());
    }
    println!("  email:   {}", user.email);
    println!("  phone:   {}", user.phone);
}

fn print_order(order: &Order) {
    let items: Vec<String> = order
        .items
        .iter()
        .map(|i| format!("{} × {}", i.name, i.qty))
        .collect();
    println!(
        "#{}  {}  {}  {}",
        order.id,
        order.created_at.format("%Y-%m-%d %H:%M:%S"),
        format_price(order.total),
        items.join(", ")
    );
}
