// src/noyau/jetons.rs

use std::fmt;

use super::erreur::ErreurLexicale;
use super::registre::{self, Constante, Entree, Fonction};

/// Au-delà, l'entrée est traitée comme vide.
pub const LONGUEUR_MAX_ENTREE: usize = 1024;

/// Littéral numérique : texte exact (source de la valeur multiprécision)
/// + approximation f64 gardée pour le diagnostic.
#[derive(Clone, Debug, PartialEq)]
pub struct Litteral {
    pub texte: String,
    pub approx: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Tok {
    Entier(Litteral),
    Flottant(Litteral),

    Fonction(Fonction),
    Constante(Constante),
    // Nom absent du registre : erreur au niveau du parseur, pas du lexeur
    Ident(String),

    Plus,
    Minus,
    Star,
    Slash,
    Caret,

    LPar,
    RPar,
    Virgule,

    EgalEgal,
    Different,
    Inf,
    InfEgal,
    Sup,
    SupEgal,

    Fin,
    Invalide(ErreurLexicale),
}

impl Tok {
    pub fn est_nombre(&self) -> bool {
        matches!(self, Tok::Entier(_) | Tok::Flottant(_))
    }
}

impl fmt::Display for Tok {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tok::Entier(l) | Tok::Flottant(l) => write!(f, "{}", l.texte),
            Tok::Fonction(fun) => write!(f, "{}", fun.nom()),
            Tok::Constante(c) => write!(f, "{}", c.nom()),
            Tok::Ident(nom) => write!(f, "{nom}"),

            Tok::Plus => write!(f, "+"),
            Tok::Minus => write!(f, "-"),
            Tok::Star => write!(f, "*"),
            Tok::Slash => write!(f, "/"),
            Tok::Caret => write!(f, "^"),

            Tok::LPar => write!(f, "("),
            Tok::RPar => write!(f, ")"),
            Tok::Virgule => write!(f, ","),

            Tok::EgalEgal => write!(f, "=="),
            Tok::Different => write!(f, "!="),
            Tok::Inf => write!(f, "<"),
            Tok::InfEgal => write!(f, "<="),
            Tok::Sup => write!(f, ">"),
            Tok::SupEgal => write!(f, ">="),

            Tok::Fin => write!(f, "fin"),
            Tok::Invalide(e) => write!(f, "<{e}>"),
        }
    }
}

/// Lexeur à la demande : le parseur tire un jeton à la fois.
pub struct Lexeur {
    chars: Vec<char>,
    i: usize,
    rejetee: Option<usize>,
}

impl Lexeur {
    pub fn new(s: &str) -> Self {
        let n = s.len();
        if n > LONGUEUR_MAX_ENTREE {
            log::warn!("entrée rejetée: {n} caractères (maximum {LONGUEUR_MAX_ENTREE})");
            return Self {
                chars: Vec::new(),
                i: 0,
                rejetee: Some(n),
            };
        }
        Self {
            chars: s.chars().collect(),
            i: 0,
            rejetee: None,
        }
    }

    /// Erreur à signaler si l'entrée a été rejetée pour sa longueur.
    pub fn entree_rejetee(&self) -> Option<ErreurLexicale> {
        self.rejetee.map(|longueur| ErreurLexicale::EntreeTropLongue {
            longueur,
            max: LONGUEUR_MAX_ENTREE,
        })
    }

    fn voir(&self, k: usize) -> Option<char> {
        self.chars.get(self.i + k).copied()
    }

    fn voir_chiffre(&self, k: usize) -> bool {
        self.voir(k).is_some_and(|c| c.is_ascii_digit())
    }

    pub fn next_token(&mut self) -> Tok {
        while self.voir(0).is_some_and(char::is_whitespace) {
            self.i += 1;
        }

        let c = match self.voir(0) {
            Some(c) => c,
            None => return Tok::Fin,
        };

        if c.is_ascii_digit() || c == '.' {
            return self.nombre();
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = self.i;
            while self
                .voir(0)
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                self.i += 1;
            }
            let mot: String = self.chars[start..self.i].iter().collect();
            return match registre::cherche(&mot) {
                Some(Entree::Fonction(f)) => Tok::Fonction(f),
                Some(Entree::Constante(k)) => Tok::Constante(k),
                None => Tok::Ident(mot),
            };
        }

        self.i += 1;
        let suivi_de_egal = self.voir(0) == Some('=');
        match c {
            '+' => Tok::Plus,
            '-' => Tok::Minus,
            '*' => Tok::Star,
            '/' => Tok::Slash,
            '^' => Tok::Caret,
            '(' => Tok::LPar,
            ')' => Tok::RPar,
            ',' => Tok::Virgule,

            '=' | '!' | '<' | '>' if suivi_de_egal => {
                self.i += 1;
                match c {
                    '=' => Tok::EgalEgal,
                    '!' => Tok::Different,
                    '<' => Tok::InfEgal,
                    _ => Tok::SupEgal,
                }
            }
            '<' => Tok::Inf,
            '>' => Tok::Sup,
            '=' | '!' => Tok::Invalide(ErreurLexicale::OperateurIncomplet(c)),

            _ => Tok::Invalide(ErreurLexicale::CaractereInattendu(c)),
        }
    }

    /// chiffres/points, puis exposant seulement si un chiffre suit (après signe éventuel) :
    /// "3e" donne 3 puis la constante e.
    fn nombre(&mut self) -> Tok {
        let start = self.i;

        if self.voir(0) == Some('.') && !self.voir_chiffre(1) {
            self.i += 1;
            return Tok::Invalide(ErreurLexicale::LitteralInvalide(".".into()));
        }

        let mut points = 0usize;
        while let Some(c) = self.voir(0) {
            if c == '.' {
                points += 1;
            } else if !c.is_ascii_digit() {
                break;
            }
            self.i += 1;
        }

        let mut exposant = false;
        if matches!(self.voir(0), Some('e') | Some('E')) {
            let signe = matches!(self.voir(1), Some('+') | Some('-'));
            let debut_chiffres = if signe { 2 } else { 1 };
            if self.voir_chiffre(debut_chiffres) {
                self.i += debut_chiffres;
                while self.voir_chiffre(0) {
                    self.i += 1;
                }
                exposant = true;
            }
        }

        let texte: String = self.chars[start..self.i].iter().collect();
        if points > 1 {
            return Tok::Invalide(ErreurLexicale::LitteralInvalide(texte));
        }

        let approx = match texte.parse::<f64>() {
            Ok(v) => v,
            Err(_) => return Tok::Invalide(ErreurLexicale::LitteralInvalide(texte)),
        };

        let lit = Litteral { texte, approx };
        if points == 0 && !exposant {
            Tok::Entier(lit)
        } else {
            Tok::Flottant(lit)
        }
    }
}

/// Flux complet (sans le jeton de fin).
pub fn tokenize(s: &str) -> Vec<Tok> {
    let mut lex = Lexeur::new(s);
    let mut out = Vec::new();
    loop {
        match lex.next_token() {
            Tok::Fin => break,
            t => out.push(t),
        }
    }
    out
}

/// Format utilitaire (journal de debug) : liste de jetons en texte.
pub fn format_jetons(tokens: &[Tok]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
