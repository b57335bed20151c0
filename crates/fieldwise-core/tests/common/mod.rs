//! Shared fixtures for the fieldwise integration tests.

use fieldwise_core::{introspect_enum, introspect_struct};
use std::cell::OnceCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub number: u32,
    pub city: String,
}

introspect_struct!(Address {
    street,
    number,
    city
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Member,
}

introspect_enum!(Role { Admin, Member });

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub height: f64,
    pub role: Role,
    pub address: Address,
    pub nicknames: Vec<String>,
    pub tags: HashSet<String>,
    pub scores: BTreeMap<String, u32>,
    pub email: Option<String>,
}

introspect_struct!(Person {
    name,
    age,
    height,
    role,
    address,
    nicknames,
    tags,
    scores,
    email
});

/// Same shape as [`Person`] under another type name
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct PersonDto {
    pub name: String,
    pub age: u32,
    pub height: f64,
    pub role: Role,
    pub address: Address,
    pub nicknames: Vec<String>,
    pub tags: HashSet<String>,
    pub scores: BTreeMap<String, u32>,
    pub email: Option<String>,
}

introspect_struct!(PersonDto {
    name,
    age,
    height,
    role,
    address,
    nicknames,
    tags,
    scores,
    email
});

impl From<Person> for PersonDto {
    fn from(person: Person) -> Self {
        Self {
            name: person.name,
            age: person.age,
            height: person.height,
            role: person.role,
            address: person.address,
            nicknames: person.nicknames,
            tags: person.tags,
            scores: person.scores,
            email: person.email,
        }
    }
}

#[allow(dead_code)]
pub fn address() -> Address {
    Address {
        street: "Main St".to_string(),
        number: 12,
        city: "Springfield".to_string(),
    }
}

#[allow(dead_code)]
pub fn person() -> Person {
    let mut scores = BTreeMap::new();
    scores.insert("chess".to_string(), 1800);
    scores.insert("go".to_string(), 3);
    Person {
        name: "Ada".to_string(),
        age: 36,
        height: 1.65,
        role: Role::Admin,
        address: address(),
        nicknames: vec!["countess".to_string(), "enchantress".to_string()],
        tags: ["math".to_string(), "poetry".to_string()].into_iter().collect(),
        scores,
        email: Some("ada@example.com".to_string()),
    }
}

/// Node of a linked structure that can point back to itself
#[allow(dead_code)]
pub struct Link {
    pub name: String,
    pub next: OnceCell<Rc<Link>>,
}

introspect_struct!(Link { name, next });

/// Ring of links named after `names`, the last pointing to the first
#[allow(dead_code)]
pub fn ring(names: &[&str]) -> Vec<Rc<Link>> {
    let links: Vec<Rc<Link>> = names
        .iter()
        .map(|name| {
            Rc::new(Link {
                name: name.to_string(),
                next: OnceCell::new(),
            })
        })
        .collect();
    for (index, link) in links.iter().enumerate() {
        let next = Rc::clone(&links[(index + 1) % links.len()]);
        let _ = link.next.set(next);
    }
    links
}

/// Team whose members point back to it
#[allow(dead_code)]
pub struct Team {
    pub name: String,
    pub members: OnceCell<Vec<Rc<Member>>>,
}

#[allow(dead_code)]
pub struct Member {
    pub name: String,
    pub team: OnceCell<Rc<Team>>,
}

introspect_struct!(Team { name, members });
introspect_struct!(Member { name, team });

/// Team named `name` with one member per entry of `members`, in order
#[allow(dead_code)]
pub fn team(name: &str, members: &[&str]) -> Rc<Team> {
    let team = Rc::new(Team {
        name: name.to_string(),
        members: OnceCell::new(),
    });
    let members: Vec<Rc<Member>> = members
        .iter()
        .map(|member| {
            let team_cell = OnceCell::new();
            let _ = team_cell.set(Rc::clone(&team));
            Rc::new(Member {
                name: member.to_string(),
                team: team_cell,
            })
        })
        .collect();
    let _ = team.members.set(members);
    team
}
