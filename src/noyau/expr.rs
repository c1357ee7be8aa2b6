// src/noyau/expr.rs

use std::cmp::Ordering;
use std::fmt;

use astro_float::BigFloat;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use super::precision::Contexte;
use super::registre::Fonction;

/* ------------------------ Nombre ------------------------ */

/// Valeur multiprécision lue depuis le texte du littéral (jamais via un f64).
/// Un entier garde aussi sa valeur exacte : c'est elle que replie le simplificateur.
#[derive(Clone, Debug)]
pub struct Nombre {
    pub valeur: BigFloat,
    pub entier: Option<BigInt>,
    // texte d'origine, pour un rendu infixe relisible sans perte
    source: Option<String>,
}

impl Nombre {
    pub fn depuis_litteral(texte: &str, est_entier: bool, ctx: &mut Contexte) -> Self {
        let entier = if est_entier {
            BigInt::parse_bytes(texte.as_bytes(), 10)
        } else {
            None
        };
        Self {
            valeur: ctx.lire_litteral(texte),
            entier,
            source: Some(texte.to_string()),
        }
    }

    pub fn depuis_entier(n: BigInt, ctx: &mut Contexte) -> Self {
        Self {
            valeur: ctx.lire_litteral(&n.to_string()),
            entier: Some(n),
            source: None,
        }
    }

    pub fn est_entier(&self) -> bool {
        self.entier.is_some()
    }

    pub fn est_zero(&self) -> bool {
        match &self.entier {
            Some(n) => n.is_zero(),
            None => self.valeur.is_zero(),
        }
    }

    pub fn est_un(&self) -> bool {
        match &self.entier {
            Some(n) => n.is_one(),
            None => self.valeur.cmp(&BigFloat::from_i32(1, 64)) == Some(0),
        }
    }

    /// Ordre sur la valeur, puis flottant < entier à valeur égale.
    pub fn comparer(&self, autre: &Nombre) -> Ordering {
        let par_valeur = match (&self.entier, &autre.entier) {
            (Some(a), Some(b)) => a.cmp(b),
            _ => match self.valeur.cmp(&autre.valeur) {
                Some(s) => s.cmp(&0),
                None => self.valeur.is_nan().cmp(&autre.valeur.is_nan()),
            },
        };
        par_valeur.then(self.est_entier().cmp(&autre.est_entier()))
    }
}

impl PartialEq for Nombre {
    fn eq(&self, autre: &Self) -> bool {
        self.comparer(autre) == Ordering::Equal
    }
}

impl fmt::Display for Nombre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.entier, &self.source) {
            (Some(n), _) if n.is_negative() => write!(f, "(-{})", n.abs()),
            (Some(n), _) => write!(f, "{n}"),
            (None, Some(s)) => write!(f, "{s}"),
            (None, None) if self.valeur.is_negative() => write!(f, "(-{})", self.valeur.abs()),
            (None, None) => write!(f, "{}", self.valeur),
        }
    }
}

/* ------------------------ Opérateurs ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpBinaire {
    Plus,
    Moins,
    Fois,
    Divise,
    Puissance,
    Egal,
    Different,
    Inf,
    InfEgal,
    Sup,
    SupEgal,
}

impl OpBinaire {
    pub fn symbole(self) -> &'static str {
        match self {
            OpBinaire::Plus => "+",
            OpBinaire::Moins => "-",
            OpBinaire::Fois => "*",
            OpBinaire::Divise => "/",
            OpBinaire::Puissance => "^",
            OpBinaire::Egal => "==",
            OpBinaire::Different => "!=",
            OpBinaire::Inf => "<",
            OpBinaire::InfEgal => "<=",
            OpBinaire::Sup => ">",
            OpBinaire::SupEgal => ">=",
        }
    }

    pub fn est_commutatif(self) -> bool {
        matches!(self, OpBinaire::Plus | OpBinaire::Fois)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpUnaire {
    Plus,
    Moins,
}

/* ------------------------ Arbre ------------------------ */

/// Chaque enfant appartient à son parent (pas de partage, pas de cycle).
/// `PartialEq` dérivé = égalité structurelle.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Nombre(Nombre),
    // constante du registre (nom canonique) ou symbole libre en mode symbolique
    Constante(String),
    // nombre d'arguments = arité du registre
    Appel(Fonction, Vec<Expr>),
    BinOp(OpBinaire, Box<Expr>, Box<Expr>),
    Unaire(OpUnaire, Box<Expr>),
}

impl Expr {
    pub fn entier(n: impl Into<BigInt>, ctx: &mut Contexte) -> Expr {
        Expr::Nombre(Nombre::depuis_entier(n.into(), ctx))
    }

    pub fn binop(op: OpBinaire, a: Expr, b: Expr) -> Expr {
        Expr::BinOp(op, Box::new(a), Box::new(b))
    }

    pub fn unaire(op: OpUnaire, x: Expr) -> Expr {
        Expr::Unaire(op, Box::new(x))
    }

    pub fn est_zero(&self) -> bool {
        matches!(self, Expr::Nombre(n) if n.est_zero())
    }

    pub fn est_un(&self) -> bool {
        matches!(self, Expr::Nombre(n) if n.est_un())
    }

    /// Valeur exacte si le nœud est un littéral entier.
    pub fn comme_entier(&self) -> Option<&BigInt> {
        match self {
            Expr::Nombre(n) => n.entier.as_ref(),
            _ => None,
        }
    }

    pub fn est_constante(&self, nom: &str) -> bool {
        matches!(self, Expr::Constante(c) if c == nom)
    }
}

/// Rendu infixe entièrement parenthésé, relisible par le parseur.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Nombre(n) => write!(f, "{n}"),
            Expr::Constante(c) => write!(f, "{c}"),
            Expr::Appel(fun, args) => {
                write!(f, "{}(", fun.nom())?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
            Expr::BinOp(op, a, b) => write!(f, "({a}{}{b})", op.symbole()),
            Expr::Unaire(OpUnaire::Plus, x) => write!(f, "(+{x})"),
            Expr::Unaire(OpUnaire::Moins, x) => write!(f, "(-{x})"),
        }
    }
}
