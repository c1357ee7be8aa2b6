// src/noyau/registre.rs
//
// Registre statique des fonctions et constantes nommées.
// Recherche sensible à la casse ; les alias (arcsin, ln, PI…) pointent vers la même identité.

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Sqrt,
    Log,
    Log10,
    Exp,
    Abs,
    Floor,
    Ceil,
    Pow,
}

/// Fonctions à un argument (évaluation numérique).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FonctionUnaire {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Sqrt,
    Log,
    Log10,
    Exp,
    Abs,
    Floor,
    Ceil,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FonctionBinaire {
    Atan2,
    Pow,
}

/// Arité portée par le type : l'évaluateur ne traite que des cas possibles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Forme {
    Une(FonctionUnaire),
    Deux(FonctionBinaire),
}

impl Fonction {
    pub fn forme(self) -> Forme {
        use FonctionUnaire as U;
        let u = match self {
            Fonction::Atan2 => return Forme::Deux(FonctionBinaire::Atan2),
            Fonction::Pow => return Forme::Deux(FonctionBinaire::Pow),
            Fonction::Sin => U::Sin,
            Fonction::Cos => U::Cos,
            Fonction::Tan => U::Tan,
            Fonction::Asin => U::Asin,
            Fonction::Acos => U::Acos,
            Fonction::Atan => U::Atan,
            Fonction::Sinh => U::Sinh,
            Fonction::Cosh => U::Cosh,
            Fonction::Tanh => U::Tanh,
            Fonction::Asinh => U::Asinh,
            Fonction::Acosh => U::Acosh,
            Fonction::Atanh => U::Atanh,
            Fonction::Sqrt => U::Sqrt,
            Fonction::Log => U::Log,
            Fonction::Log10 => U::Log10,
            Fonction::Exp => U::Exp,
            Fonction::Abs => U::Abs,
            Fonction::Floor => U::Floor,
            Fonction::Ceil => U::Ceil,
        };
        Forme::Une(u)
    }

    pub fn arite(self) -> usize {
        match self.forme() {
            Forme::Une(_) => 1,
            Forme::Deux(_) => 2,
        }
    }

    /// Nom canonique (celui utilisé au rendu infixe).
    pub fn nom(self) -> &'static str {
        use Fonction::*;
        match self {
            Sin => "sin",
            Cos => "cos",
            Tan => "tan",
            Asin => "asin",
            Acos => "acos",
            Atan => "atan",
            Atan2 => "atan2",
            Sinh => "sinh",
            Cosh => "cosh",
            Tanh => "tanh",
            Asinh => "asinh",
            Acosh => "acosh",
            Atanh => "atanh",
            Sqrt => "sqrt",
            Log => "log",
            Log10 => "log10",
            Exp => "exp",
            Abs => "abs",
            Floor => "floor",
            Ceil => "ceil",
            Pow => "pow",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Constante {
    Pi,
    E,
    Ln2,
    Ln10,
    Gamma,
    Sqrt2,
}

impl Constante {
    pub fn nom(self) -> &'static str {
        match self {
            Constante::Pi => "pi",
            Constante::E => "e",
            Constante::Ln2 => "ln2",
            Constante::Ln10 => "ln10",
            Constante::Gamma => "gamma",
            Constante::Sqrt2 => "sqrt2",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entree {
    Fonction(Fonction),
    Constante(Constante),
}

const TABLE: &[(&str, Entree)] = &[
    ("sin", Entree::Fonction(Fonction::Sin)),
    ("cos", Entree::Fonction(Fonction::Cos)),
    ("tan", Entree::Fonction(Fonction::Tan)),
    ("asin", Entree::Fonction(Fonction::Asin)),
    ("arcsin", Entree::Fonction(Fonction::Asin)),
    ("acos", Entree::Fonction(Fonction::Acos)),
    ("arccos", Entree::Fonction(Fonction::Acos)),
    ("atan", Entree::Fonction(Fonction::Atan)),
    ("arctan", Entree::Fonction(Fonction::Atan)),
    ("atan2", Entree::Fonction(Fonction::Atan2)),
    ("arctan2", Entree::Fonction(Fonction::Atan2)),
    ("sinh", Entree::Fonction(Fonction::Sinh)),
    ("cosh", Entree::Fonction(Fonction::Cosh)),
    ("tanh", Entree::Fonction(Fonction::Tanh)),
    ("asinh", Entree::Fonction(Fonction::Asinh)),
    ("arcsinh", Entree::Fonction(Fonction::Asinh)),
    ("acosh", Entree::Fonction(Fonction::Acosh)),
    ("arccosh", Entree::Fonction(Fonction::Acosh)),
    ("atanh", Entree::Fonction(Fonction::Atanh)),
    ("arctanh", Entree::Fonction(Fonction::Atanh)),
    ("sqrt", Entree::Fonction(Fonction::Sqrt)),
    ("log", Entree::Fonction(Fonction::Log)),
    ("ln", Entree::Fonction(Fonction::Log)),
    ("log10", Entree::Fonction(Fonction::Log10)),
    ("exp", Entree::Fonction(Fonction::Exp)),
    ("abs", Entree::Fonction(Fonction::Abs)),
    ("floor", Entree::Fonction(Fonction::Floor)),
    ("ceil", Entree::Fonction(Fonction::Ceil)),
    ("pow", Entree::Fonction(Fonction::Pow)),
    ("pi", Entree::Constante(Constante::Pi)),
    ("PI", Entree::Constante(Constante::Pi)),
    ("e", Entree::Constante(Constante::E)),
    ("E", Entree::Constante(Constante::E)),
    ("ln2", Entree::Constante(Constante::Ln2)),
    ("LN2", Entree::Constante(Constante::Ln2)),
    ("ln10", Entree::Constante(Constante::Ln10)),
    ("LN10", Entree::Constante(Constante::Ln10)),
    ("gamma", Entree::Constante(Constante::Gamma)),
    ("GAMMA", Entree::Constante(Constante::Gamma)),
    ("sqrt2", Entree::Constante(Constante::Sqrt2)),
    ("SQRT2", Entree::Constante(Constante::Sqrt2)),
];

pub fn cherche(nom: &str) -> Option<Entree> {
    TABLE.iter().find(|(n, _)| *n == nom).map(|(_, e)| *e)
}

/// Résout un nom de constante (alias compris) ; `None` pour un symbole libre.
pub fn constante_par_nom(nom: &str) -> Option<Constante> {
    match cherche(nom)? {
        Entree::Constante(c) => Some(c),
        Entree::Fonction(_) => None,
    }
}
