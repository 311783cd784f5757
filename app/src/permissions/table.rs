//! Static mapping from functional module to the permission codes that govern it.

use std::fmt;
use std::str::FromStr;

pub mod codes {
    pub const DASHBOARD_VER: &str = "DASHBOARD_VER";

    pub const FRANQUICIAS_VER: &str = "FRANQUICIAS_VER";
    pub const FRANQUICIAS_CREAR: &str = "FRANQUICIAS_CREAR";
    pub const FRANQUICIAS_EDITAR: &str = "FRANQUICIAS_EDITAR";
    pub const FRANQUICIAS_ELIMINAR: &str = "FRANQUICIAS_ELIMINAR";

    pub const USUARIOS_VER: &str = "USUARIOS_VER";
    pub const USUARIOS_CREAR: &str = "USUARIOS_CREAR";
    pub const USUARIOS_EDITAR: &str = "USUARIOS_EDITAR";
    pub const USUARIOS_ELIMINAR: &str = "USUARIOS_ELIMINAR";

    pub const ALUMNOS_VER: &str = "ALUMNOS_VER";
    pub const ALUMNOS_CREAR: &str = "ALUMNOS_CREAR";
    pub const ALUMNOS_EDITAR: &str = "ALUMNOS_EDITAR";
    pub const ALUMNOS_ELIMINAR: &str = "ALUMNOS_ELIMINAR";

    pub const DISCIPLINAS_VER: &str = "DISCIPLINAS_VER";
    pub const DISCIPLINAS_CREAR: &str = "DISCIPLINAS_CREAR";
    pub const DISCIPLINAS_EDITAR: &str = "DISCIPLINAS_EDITAR";
    pub const DISCIPLINAS_ELIMINAR: &str = "DISCIPLINAS_ELIMINAR";

    pub const HORARIOS_VER: &str = "HORARIOS_VER";
    pub const HORARIOS_CREAR: &str = "HORARIOS_CREAR";
    pub const HORARIOS_EDITAR: &str = "HORARIOS_EDITAR";
    pub const HORARIOS_ELIMINAR: &str = "HORARIOS_ELIMINAR";

    pub const PRODUCTOS_VER: &str = "PRODUCTOS_VER";
    pub const PRODUCTOS_CREAR: &str = "PRODUCTOS_CREAR";
    pub const PRODUCTOS_EDITAR: &str = "PRODUCTOS_EDITAR";
    pub const PRODUCTOS_ELIMINAR: &str = "PRODUCTOS_ELIMINAR";

    pub const EVENTOS_VER: &str = "EVENTOS_VER";
    pub const EVENTOS_CREAR: &str = "EVENTOS_CREAR";
    pub const EVENTOS_EDITAR: &str = "EVENTOS_EDITAR";
    pub const EVENTOS_ELIMINAR: &str = "EVENTOS_ELIMINAR";

    pub const PROMOCIONES_VER: &str = "PROMOCIONES_VER";
    pub const PROMOCIONES_CREAR: &str = "PROMOCIONES_CREAR";
    pub const PROMOCIONES_EDITAR: &str = "PROMOCIONES_EDITAR";
    pub const PROMOCIONES_ELIMINAR: &str = "PROMOCIONES_ELIMINAR";

    pub const CONFIGURACION_VER: &str = "CONFIGURACION_VER";
    pub const CONFIGURACION_EDITAR: &str = "CONFIGURACION_EDITAR";
    /// Advanced configuration; one of the two administrator markers.
    pub const CONFIGURACION_AVANZADA_VER: &str = "CONFIGURACION_AVANZADA_VER";
    /// Database backup and restore; the other administrator marker.
    pub const RESPALDO_DATOS: &str = "RESPALDO_DATOS";
}

use codes::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    Dashboard,
    Franquicias,
    Usuarios,
    Alumnos,
    Disciplinas,
    Horarios,
    Productos,
    Eventos,
    Promociones,
    Configuracion,
}

impl Module {
    pub const fn as_str(self) -> &'static str {
        match self {
            Module::Dashboard => "Dashboard",
            Module::Franquicias => "Franquicias",
            Module::Usuarios => "Usuarios",
            Module::Alumnos => "Alumnos",
            Module::Disciplinas => "Disciplinas",
            Module::Horarios => "Horarios",
            Module::Productos => "Productos",
            Module::Eventos => "Eventos",
            Module::Promociones => "Promociones",
            Module::Configuracion => "Configuracion",
        }
    }

    /// Codes governing this module, in table order.
    pub fn codes(self) -> &'static [&'static str] {
        PERMISSION_TABLE
            .iter()
            .find(|(module, _)| *module == self)
            .map(|(_, codes)| *codes)
            .unwrap_or(&[])
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModule(pub String);

impl fmt::Display for UnknownModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown module `{}`", self.0)
    }
}

impl std::error::Error for UnknownModule {}

impl FromStr for Module {
    type Err = UnknownModule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PERMISSION_TABLE
            .iter()
            .map(|(module, _)| *module)
            .find(|module| module.as_str() == s)
            .ok_or_else(|| UnknownModule(s.to_string()))
    }
}

/// CRUD verb a permission code grants, recognised by its suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Create,
    Edit,
    Delete,
}

impl Action {
    pub const fn keyword(self) -> &'static str {
        match self {
            Action::View => "_VER",
            Action::Create => "_CREAR",
            Action::Edit => "_EDITAR",
            Action::Delete => "_ELIMINAR",
        }
    }

    pub fn matches(self, code: &str) -> bool {
        code.ends_with(self.keyword())
    }
}

pub const PERMISSION_TABLE: &[(Module, &[&str])] = &[
    (Module::Dashboard, &[DASHBOARD_VER]),
    (
        Module::Franquicias,
        &[
            FRANQUICIAS_VER,
            FRANQUICIAS_CREAR,
            FRANQUICIAS_EDITAR,
            FRANQUICIAS_ELIMINAR,
        ],
    ),
    (
        Module::Usuarios,
        &[USUARIOS_VER, USUARIOS_CREAR, USUARIOS_EDITAR, USUARIOS_ELIMINAR],
    ),
    (
        Module::Alumnos,
        &[ALUMNOS_VER, ALUMNOS_CREAR, ALUMNOS_EDITAR, ALUMNOS_ELIMINAR],
    ),
    (
        Module::Disciplinas,
        &[
            DISCIPLINAS_VER,
            DISCIPLINAS_CREAR,
            DISCIPLINAS_EDITAR,
            DISCIPLINAS_ELIMINAR,
        ],
    ),
    (
        Module::Horarios,
        &[HORARIOS_VER, HORARIOS_CREAR, HORARIOS_EDITAR, HORARIOS_ELIMINAR],
    ),
    (
        Module::Productos,
        &[
            PRODUCTOS_VER,
            PRODUCTOS_CREAR,
            PRODUCTOS_EDITAR,
            PRODUCTOS_ELIMINAR,
        ],
    ),
    (
        Module::Eventos,
        &[EVENTOS_VER, EVENTOS_CREAR, EVENTOS_EDITAR, EVENTOS_ELIMINAR],
    ),
    (
        Module::Promociones,
        &[
            PROMOCIONES_VER,
            PROMOCIONES_CREAR,
            PROMOCIONES_EDITAR,
            PROMOCIONES_ELIMINAR,
        ],
    ),
    (
        Module::Configuracion,
        &[
            CONFIGURACION_VER,
            CONFIGURACION_EDITAR,
            CONFIGURACION_AVANZADA_VER,
            RESPALDO_DATOS,
        ],
    ),
];

/// Looks a module up by its display name.
pub fn lookup(name: &str) -> Option<(Module, &'static [&'static str])> {
    PERMISSION_TABLE
        .iter()
        .find(|(module, _)| module.as_str() == name)
        .copied()
}

/// Every code in the table, in table order. Used to seed administrator accounts.
pub fn all_codes() -> impl Iterator<Item = &'static str> {
    PERMISSION_TABLE
        .iter()
        .flat_map(|(_, codes)| codes.iter().copied())
}
