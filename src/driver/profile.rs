//! Static collection profiles, one per product family.
//!
//! A profile declares where every record field comes from (an OID, a REST
//! endpoint, a slice of the captured config, a scraped page) plus the shape
//! of the license/card/interface tables and how the raw config is captured.
//! `TableDriver` interprets these tables; only the genuinely odd products
//! (Elemental, SVP2000) get hand-written drivers.

use crate::net::{TelnetScript, TelnetStep};

/// sysUpTime, wanted by almost every family.
const UPTIME_OID: &str = "1.3.6.1.2.1.1.3.0";

/// Where one `info` field comes from.
#[derive(Debug, Clone, Copy)]
pub enum FieldSource {
    /// SNMP GET of a scalar instance.
    SnmpGet(&'static str),
    /// SNMP GET of an integer code mapped to a product/board name.
    SnmpGetMapped {
        oid: &'static str,
        map: &'static [(i64, &'static str)],
        fallback: &'static str,
    },
    /// HTTP GET of a JSON document, value plucked by key path.
    HttpJsonPath {
        uri: &'static str,
        path: &'static [&'static str],
    },
    /// Attribute of the first matching element in the captured config.
    ConfigXmlAttr {
        tag: &'static str,
        attr: &'static str,
    },
    /// `value_attr` of the element whose `key_attr` equals `key`, any tag.
    ConfigXmlNamed {
        key_attr: &'static str,
        key: &'static str,
        value_attr: &'static str,
    },
    /// Like `ConfigXmlNamed` for the chassis unique id: digits with
    /// embedded spaces, stored as zero-padded lowercase hex.
    ConfigXmlChipId {
        key_attr: &'static str,
        key: &'static str,
        value_attr: &'static str,
    },
    /// First capture group of a regex run over the scraped page/session.
    ScrapeRegex(&'static str),
}

/// One declared `info` field. `default` is what the field reports when the
/// source answers with nothing usable.
#[derive(Debug, Clone, Copy)]
pub struct InfoField {
    pub name: &'static str,
    pub source: FieldSource,
    pub default: Option<&'static str>,
}

impl InfoField {
    const fn snmp(name: &'static str, oid: &'static str) -> Self {
        Self {
            name,
            source: FieldSource::SnmpGet(oid),
            default: None,
        }
    }
}

/// How the license table is collected.
#[derive(Debug, Clone, Copy)]
pub enum LicenseSource {
    None,
    /// Indexed walk; keep rows whose status code reads "enabled" (2),
    /// stored as `true`.
    SnmpStatus {
        index_oid: &'static str,
        name_oid: &'static str,
        status_oid: &'static str,
    },
    /// Indexed walk; keep rows with a truthy value, stored verbatim.
    SnmpValue {
        index_oid: &'static str,
        name_oid: &'static str,
        value_oid: &'static str,
    },
    /// Indexed walk; keep rows where both name and status answered,
    /// status stored as-is.
    SnmpBoth {
        index_oid: &'static str,
        name_oid: &'static str,
        status_oid: &'static str,
    },
    /// Walk a name column directly; presence means licensed.
    SnmpNames { name_oid: &'static str },
    /// XML license file served over HTTP: `licenseKey` entries with a
    /// description and an instance count.
    HttpXml { uri: &'static str },
}

/// How per-slot column instances are addressed.
#[derive(Debug, Clone, Copy)]
pub enum CardIndexStyle {
    /// GET `column.slot`.
    Plain,
    /// GET `column.slot.0`.
    SubZero,
    /// GET `column.(slot+1).0`; slot instances are 1-indexed.
    PlusOneSubZero,
    /// GET-NEXT at `column.(slot-1)`; the agent mis-answers plain GETs.
    NextFromPrevious,
}

/// Board-code to board-name mapping for agents that report integer codes
/// in the `type` column.
#[derive(Debug, Clone, Copy)]
pub struct CardTypeMap {
    pub codes: &'static [(i64, &'static str)],
    pub fallback: &'static str,
}

/// Option-card table shape.
#[derive(Debug, Clone, Copy)]
pub struct CardProfile {
    /// Walk root for slot discovery; also the `slotnum` column.
    pub slot_oid: &'static str,
    pub columns: &'static [(&'static str, &'static str)],
    pub index_style: CardIndexStyle,
    pub type_map: Option<CardTypeMap>,
}

/// Secondary page/session whose text feeds `ScrapeRegex` fields.
#[derive(Debug, Clone, Copy)]
pub enum ScrapeSource {
    HttpGet { uri: &'static str },
    Telnet(&'static TelnetScript),
}

/// How the raw config blob is captured.
#[derive(Debug, Clone, Copy)]
pub enum ConfigCapture {
    None,
    /// Plain GET; `auth` overrides the default device token.
    HttpGet {
        uri: &'static str,
        auth: Option<&'static str>,
    },
    /// POST a login endpoint, pluck a session token from the JSON reply,
    /// then GET the config with the token cookie.
    HttpTokenGet {
        login_uri: &'static str,
        token_path: &'static [&'static str],
        config_uri: &'static str,
    },
    /// Scripted telnet session, captured verbatim.
    Telnet(&'static TelnetScript),
    /// Scripted telnet session with prompt characters stripped.
    TelnetTrimmed(&'static TelnetScript),
}

/// The complete collection recipe for one product family.
#[derive(Debug, Clone, Copy)]
pub struct DriverProfile {
    pub fields: &'static [InfoField],
    pub licenses: LicenseSource,
    pub cards: Option<CardProfile>,
    /// Standard MIB-II two-stage interface walk.
    pub interfaces: bool,
    pub scrape: Option<ScrapeSource>,
    pub config: ConfigCapture,
}

// ---------------------------------------------------------------------------
// Ericsson/Tandberg receiver and mux families (enterprise 1773)
// ---------------------------------------------------------------------------

const ERICSSON_PRODUCT: InfoField =
    InfoField::snmp("productname", "1.3.6.1.4.1.1773.1.1.1.7.0");
const ERICSSON_IPADDRESS: InfoField =
    InfoField::snmp("ipaddress", "1.3.6.1.4.1.1773.1.1.1.1.0");
const ERICSSON_SWVERSION: InfoField =
    InfoField::snmp("swversion", "1.3.6.1.4.1.1773.1.1.1.16.0");
const UPTIME: InfoField = InfoField::snmp("uptime", UPTIME_OID);

const ERICSSON_CARD_COLUMNS: &[(&str, &str)] = &[
    ("slotnum", "1.3.6.1.4.1.1773.1.1.3.1.1"),
    ("swversion", "1.3.6.1.4.1.1773.1.1.3.1.4"),
    ("hwversion", "1.3.6.1.4.1.1773.1.1.3.1.5"),
    ("fwversion", "1.3.6.1.4.1.1773.1.1.3.1.7"),
    ("serialnumber", "1.3.6.1.4.1.1773.1.1.3.1.8"),
    ("type", "1.3.6.1.4.1.1773.1.1.3.1.9"),
];

const ERICSSON_CARDS: CardProfile = CardProfile {
    slot_oid: "1.3.6.1.4.1.1773.1.1.3.1.1",
    columns: ERICSSON_CARD_COLUMNS,
    index_style: CardIndexStyle::Plain,
    type_map: None,
};

const ERICSSON_LICENSE_IDX: &str = "1.3.6.1.4.1.1773.1.1.13.1.1";
const ERICSSON_LICENSE_NAME: &str = "1.3.6.1.4.1.1773.1.1.13.1.2";
const ERICSSON_LICENSE_STATUS: &str = "1.3.6.1.4.1.1773.1.1.13.1.3";
const ERICSSON_LICENSE_VALUE: &str = "1.3.6.1.4.1.1773.1.1.13.1.4";

/// RX1290/TT12xx receivers: SNMP identity plus an XML config whose named
/// `Str` parameters carry the unit and service names.
pub static RX1200: DriverProfile = DriverProfile {
    fields: &[
        ERICSSON_PRODUCT,
        ERICSSON_IPADDRESS,
        ERICSSON_SWVERSION,
        UPTIME,
        InfoField {
            name: "unitname",
            source: FieldSource::ConfigXmlNamed {
                key_attr: "N",
                key: "Name",
                value_attr: "V",
            },
            default: None,
        },
        InfoField {
            name: "servicename",
            source: FieldSource::ConfigXmlNamed {
                key_attr: "N",
                key: "m_serviceIdStat",
                value_attr: "V",
            },
            default: None,
        },
        InfoField {
            name: "dallasid",
            source: FieldSource::ConfigXmlChipId {
                key_attr: "N",
                key: "m_caDir5UniqueId",
                value_attr: "V",
            },
            default: None,
        },
    ],
    licenses: LicenseSource::SnmpStatus {
        index_oid: ERICSSON_LICENSE_IDX,
        name_oid: ERICSSON_LICENSE_NAME,
        status_oid: ERICSSON_LICENSE_STATUS,
    },
    cards: Some(ERICSSON_CARDS),
    interfaces: false,
    scrape: None,
    config: ConfigCapture::HttpGet {
        uri: "/tcf?cgi=dcp&method=get",
        auth: Some("Basic dXNlcm5hbWU6cGFzc3dvcmQ="),
    },
};

/// Shared recipe for the 1773-family units without a retrieved per-product
/// module (RX8000, EN8000, EN8100, SM6600, MX5210): base identity OIDs plus
/// the common license and card tables.
pub static ERICSSON_GENERIC: DriverProfile = DriverProfile {
    fields: &[ERICSSON_PRODUCT, ERICSSON_IPADDRESS, ERICSSON_SWVERSION, UPTIME],
    licenses: LicenseSource::SnmpValue {
        index_oid: ERICSSON_LICENSE_IDX,
        name_oid: ERICSSON_LICENSE_NAME,
        value_oid: ERICSSON_LICENSE_VALUE,
    },
    cards: Some(ERICSSON_CARDS),
    interfaces: false,
    scrape: None,
    config: ConfigCapture::None,
};

/// SPR1100/SPR1200: config XML attributes carry the identity strings the
/// agent does not expose over SNMP.
pub static SPR1000: DriverProfile = DriverProfile {
    fields: &[
        ERICSSON_IPADDRESS,
        ERICSSON_SWVERSION,
        UPTIME,
        InfoField {
            name: "productname",
            source: FieldSource::ConfigXmlAttr {
                tag: "modelName",
                attr: "value",
            },
            default: None,
        },
        InfoField {
            name: "unitname",
            source: FieldSource::ConfigXmlAttr {
                tag: "unitName",
                attr: "value",
            },
            default: None,
        },
        InfoField {
            name: "sntpserver",
            source: FieldSource::ConfigXmlAttr {
                tag: "sntpServer",
                attr: "value",
            },
            default: None,
        },
        InfoField {
            name: "serialnumber",
            source: FieldSource::ConfigXmlAttr {
                tag: "serialNumber",
                attr: "value",
            },
            default: None,
        },
    ],
    licenses: LicenseSource::SnmpValue {
        index_oid: ERICSSON_LICENSE_IDX,
        name_oid: ERICSSON_LICENSE_NAME,
        value_oid: ERICSSON_LICENSE_VALUE,
    },
    cards: Some(CardProfile {
        index_style: CardIndexStyle::SubZero,
        ..ERICSSON_CARDS
    }),
    interfaces: false,
    scrape: None,
    config: ConfigCapture::HttpGet {
        uri: "/tcf?cgi=dcp&method=get&config=0",
        auth: None,
    },
};

/// MX8400 multiplexer.
pub static MX8400: DriverProfile = DriverProfile {
    fields: &[ERICSSON_PRODUCT, ERICSSON_IPADDRESS, ERICSSON_SWVERSION, UPTIME],
    licenses: LicenseSource::SnmpValue {
        index_oid: ERICSSON_LICENSE_IDX,
        name_oid: ERICSSON_LICENSE_NAME,
        value_oid: ERICSSON_LICENSE_VALUE,
    },
    cards: Some(ERICSSON_CARDS),
    interfaces: false,
    scrape: None,
    config: ConfigCapture::None,
};

/// RX9500 bulk descrambler: identity over SNMP, the rest over its REST API.
pub static RX9500: DriverProfile = DriverProfile {
    fields: &[
        InfoField {
            name: "productname",
            source: FieldSource::SnmpGet("1.3.6.1.4.1.1773.1.1.1.7.0"),
            default: Some("ViPENC"),
        },
        ERICSSON_IPADDRESS,
        ERICSSON_SWVERSION,
        UPTIME,
        InfoField {
            name: "sntpserver",
            source: FieldSource::HttpJsonPath {
                uri: "/api/system/sntp",
                path: &["collection", "data", "ipAddress", "value"],
            },
            default: None,
        },
        InfoField {
            name: "serialnumber",
            source: FieldSource::HttpJsonPath {
                uri: "/api/hardware/chassis",
                path: &["collection", "data", "serialNumber", "value"],
            },
            default: None,
        },
    ],
    licenses: LicenseSource::HttpXml {
        uri: "/api/license/licenses.xml",
    },
    cards: Some(CardProfile {
        index_style: CardIndexStyle::PlusOneSubZero,
        ..ERICSSON_CARDS
    }),
    interfaces: true,
    scrape: None,
    config: ConfigCapture::HttpGet {
        uri: "/api/profiles/active/config",
        auth: None,
    },
};

/// EQ8096 EdgeQAM. The agent answers a board code, not a description.
pub static EQ8000: DriverProfile = DriverProfile {
    fields: &[
        ERICSSON_PRODUCT,
        ERICSSON_IPADDRESS,
        ERICSSON_SWVERSION,
        UPTIME,
        InfoField::snmp("unitname", "1.3.6.1.4.1.1773.1.3.205.1.2.0"),
        InfoField::snmp("serialnumber", "1.3.6.1.4.1.1773.1.3.205.1.1.0"),
    ],
    licenses: LicenseSource::SnmpBoth {
        index_oid: ERICSSON_LICENSE_IDX,
        name_oid: ERICSSON_LICENSE_NAME,
        status_oid: ERICSSON_LICENSE_STATUS,
    },
    cards: Some(CardProfile {
        slot_oid: "1.3.6.1.4.1.1773.1.1.3.1.1",
        columns: &[
            ("slotnum", "1.3.6.1.4.1.1773.1.1.3.1.1"),
            ("swversion", "1.3.6.1.4.1.1773.1.1.3.1.4"),
            ("hwversion", "1.3.6.1.4.1.1773.1.1.3.1.5"),
            ("fwversion", "1.3.6.1.4.1.1773.1.1.3.1.7"),
            ("serialnumber", "1.3.6.1.4.1.1773.1.1.3.1.8"),
            ("type", "1.3.6.1.4.1.1773.1.1.3.1.2"),
        ],
        index_style: CardIndexStyle::Plain,
        type_map: Some(CardTypeMap {
            codes: &[(1800, "EQ8096 Input"), (1801, "EQ8096 QAM Output")],
            fallback: "",
        }),
    }),
    interfaces: false,
    scrape: None,
    config: ConfigCapture::None,
};

/// TT6120 TS processor; the unit name only appears in the web UI.
pub static TT6120: DriverProfile = DriverProfile {
    fields: &[
        ERICSSON_PRODUCT,
        ERICSSON_IPADDRESS,
        UPTIME,
        InfoField {
            name: "unitname",
            source: FieldSource::ScrapeRegex(r#"top\.product_name = "(.+?)";"#),
            default: None,
        },
    ],
    licenses: LicenseSource::None,
    cards: Some(ERICSSON_CARDS),
    interfaces: false,
    scrape: Some(ScrapeSource::HttpGet { uri: "/update_page" }),
    config: ConfigCapture::None,
};

// ---------------------------------------------------------------------------
// NDS, Newtec, nCompass
// ---------------------------------------------------------------------------

const MX5000_CARD_TYPES: &[(i64, &str)] = &[
    (2, "S8987 Master Card"),
    (3, "S8988 4xASI Input Card"),
    (4, "S8991 2xSPI to ASI converter"),
    (5, "S8986 DVB CA Card"),
    (6, "S8992 DVB SPI"),
    (7, "S8993 GPS Rx Interface Card"),
    (8, "S8994 Regional Variation/Parasitic Transcoder Card"),
    (9, "S8996 SMPTE 310 Output Card"),
    (10, "S8997 ATM Output Card"),
    (11, "S8998 DVB ASI Optical Output Card"),
    (12, "S11628 ED Input Card"),
    (13, "S10948 Multi-Channel Bitrate Changer Card"),
    (14, "S11326 4xASI Input Card"),
    (15, "S11531 Opportunistic Data Card"),
];

/// MX5000 multiplexer (enterprise 1855). Product and board names come back
/// as integer codes; card columns only answer GET-NEXT.
pub static MX5000: DriverProfile = DriverProfile {
    fields: &[
        InfoField {
            name: "productname",
            source: FieldSource::SnmpGetMapped {
                oid: "1.3.6.1.4.1.1855.2.21.1.1.2.0",
                map: &[(1, "MX5620"), (2, "MX5640")],
                fallback: "MX5000",
            },
            default: None,
        },
        InfoField::snmp("hwversion", "1.3.6.1.4.1.1855.2.21.1.1.3.0"),
        InfoField::snmp("serialnumber", "1.3.6.1.4.1.1855.2.21.1.1.1.0"),
        UPTIME,
    ],
    licenses: LicenseSource::SnmpValue {
        index_oid: ERICSSON_LICENSE_IDX,
        name_oid: ERICSSON_LICENSE_NAME,
        value_oid: ERICSSON_LICENSE_VALUE,
    },
    cards: Some(CardProfile {
        slot_oid: "1.3.6.1.4.1.1855.2.21.1.2.1.1.1",
        columns: &[
            ("slotnum", "1.3.6.1.4.1.1855.2.21.1.2.1.1.1"),
            ("swversion", "1.3.6.1.4.1.1855.2.21.1.2.1.1.5"),
            ("hwversion", "1.3.6.1.4.1.1855.2.21.1.2.1.1.4"),
            ("fwversion", "1.3.6.1.4.1.1855.2.21.1.2.1.1.6"),
            ("serialnumber", "1.3.6.1.4.1.1855.2.21.1.2.1.1.3"),
            ("type", "1.3.6.1.4.1.1855.2.21.1.2.1.1.2"),
        ],
        index_style: CardIndexStyle::NextFromPrevious,
        type_map: Some(CardTypeMap {
            codes: MX5000_CARD_TYPES,
            fallback: "Unknown",
        }),
    }),
    interfaces: false,
    scrape: None,
    config: ConfigCapture::None,
};

/// Newtec M6100 modulator: everything over its enterprise 5835 tree, plus a
/// diagnostics download behind a login token.
pub static M6100: DriverProfile = DriverProfile {
    fields: &[
        InfoField::snmp("chipid", "1.3.6.1.4.1.5835.5.2.100.1.1.3.0"),
        InfoField::snmp("ipaddress", "1.3.6.1.4.1.5835.5.2.400.1.1.1.2"),
        InfoField::snmp("productname", "1.3.6.1.4.1.5835.5.2.100.1.1.4.0"),
        InfoField::snmp("serialnumber", "1.3.6.1.4.1.5835.5.2.100.1.1.2.0"),
        InfoField::snmp("sntpserver", "1.3.6.1.4.1.5835.5.2.100.1.8.3.2.1.2.1"),
        InfoField::snmp("swversion", "1.3.6.1.4.1.5835.5.2.100.1.1.9.0"),
        InfoField::snmp("unitname", "1.3.6.1.4.1.5835.5.2.100.1.1.1.0"),
        UPTIME,
    ],
    licenses: LicenseSource::SnmpNames {
        name_oid: "1.3.6.1.4.1.5835.5.2.100.1.1.10.1.2",
    },
    cards: None,
    interfaces: false,
    scrape: None,
    config: ConfigCapture::HttpTokenGet {
        login_uri: "/cgi-bin/pogui/auth/autologin",
        token_path: &["login", "token"],
        config_uri: "/cgi-bin/pogui/diagnostics/download",
    },
};

/// nCompass control server.
pub static NCC_SERVER: DriverProfile = DriverProfile {
    fields: &[
        InfoField::snmp("productname", "1.3.6.1.4.1.1773.3.1.1.1.0"),
        InfoField::snmp("unitname", "1.3.6.1.2.1.1.5.0"),
        InfoField::snmp("swversion", "1.3.6.1.4.1.1773.3.1.1.10.0"),
        UPTIME,
    ],
    licenses: LicenseSource::SnmpStatus {
        index_oid: ERICSSON_LICENSE_IDX,
        name_oid: ERICSSON_LICENSE_NAME,
        status_oid: ERICSSON_LICENSE_STATUS,
    },
    cards: None,
    interfaces: true,
    scrape: None,
    config: ConfigCapture::None,
};

// ---------------------------------------------------------------------------
// Switches, routers, encoders behind telnet
// ---------------------------------------------------------------------------

static BROCADE_CONFIG: TelnetScript = TelnetScript {
    steps: &[
        TelnetStep { expect: ">", send: "enable" },
        TelnetStep { expect: "#", send: "skip-page-display" },
        TelnetStep { expect: "#", send: "show running-config" },
    ],
    capture_until: "end\r\n",
};

/// Brocade/Foundry switch: SNMP identity, running config over telnet.
pub static BROCADE: DriverProfile = DriverProfile {
    fields: &[
        InfoField::snmp("productname", "1.3.6.1.4.1.1991.1.1.2.2.1.1.2.1"),
        InfoField::snmp("swversion", "1.3.6.1.2.1.1.1.0"),
        UPTIME,
        InfoField::snmp("unitname", "1.3.6.1.2.1.1.5.0"),
        InfoField::snmp("serialnumber", "1.3.6.1.4.1.1991.1.1.1.1.2.0"),
    ],
    licenses: LicenseSource::None,
    cards: None,
    interfaces: true,
    scrape: None,
    config: ConfigCapture::Telnet(&BROCADE_CONFIG),
};

static IPLEX_CONFIG: TelnetScript = TelnetScript {
    steps: &[
        TelnetStep { expect: "login: ", send: "root" },
        TelnetStep { expect: "Password: ", send: "skystream" },
        TelnetStep { expect: "]", send: "show running-config" },
        TelnetStep { expect: "?", send: "Y" },
    ],
    capture_until: "[",
};

/// iPLEX encoder: identifies through Cisco workgroup OIDs.
pub static IPLEX: DriverProfile = DriverProfile {
    fields: &[
        InfoField::snmp("productname", "1.3.6.1.4.1.9.5.1.2.16.0"),
        InfoField::snmp("swversion", "1.3.6.1.2.1.1.1.0"),
        UPTIME,
        InfoField::snmp("unitname", "1.3.6.1.2.1.1.5.0"),
        InfoField::snmp("serialnumber", "1.3.6.1.4.1.9.5.1.2.19.0"),
    ],
    licenses: LicenseSource::None,
    cards: None,
    interfaces: true,
    scrape: None,
    config: ConfigCapture::Telnet(&IPLEX_CONFIG),
};

/// Generic Cisco gear: MIB-II identity and interfaces only.
pub static CISCO: DriverProfile = DriverProfile {
    fields: &[
        InfoField::snmp("productname", "1.3.6.1.2.1.1.1.0"),
        InfoField::snmp("unitname", "1.3.6.1.2.1.1.5.0"),
        UPTIME,
    ],
    licenses: LicenseSource::None,
    cards: None,
    interfaces: true,
    scrape: None,
    config: ConfigCapture::None,
};

static LEITCH_RPARM: TelnetScript = TelnetScript {
    steps: &[
        TelnetStep { expect: "login: ", send: "leitch" },
        TelnetStep { expect: "password: ", send: "leitchadmin" },
        TelnetStep { expect: ">\r\n>", send: "show rparm" },
    ],
    capture_until: ">",
};

static LEITCH_CROSSPOINTS: TelnetScript = TelnetScript {
    steps: &[
        TelnetStep { expect: "login: ", send: "leitch" },
        TelnetStep { expect: "password: ", send: "leitchadmin" },
        TelnetStep { expect: ">\r\n>", send: "r" },
    ],
    capture_until: ">",
};

/// Leitch/Harris SDI router: no SNMP at all, everything is scraped out of
/// a telnet CLI session.
pub static LEITCH: DriverProfile = DriverProfile {
    fields: &[
        InfoField {
            name: "productname",
            source: FieldSource::ScrapeRegex("Frame Type: (.+?)\r"),
            default: None,
        },
        InfoField {
            name: "swversion",
            source: FieldSource::ScrapeRegex("Software Revision: (.+?) "),
            default: None,
        },
        InfoField {
            name: "hwversion",
            source: FieldSource::ScrapeRegex("FPGA Revision: (.+?)\r"),
            default: None,
        },
        InfoField {
            name: "serialnumber",
            source: FieldSource::ScrapeRegex("Frame Serial ID: (.+?)\r"),
            default: None,
        },
        InfoField {
            name: "chipid",
            source: FieldSource::ScrapeRegex("License ID: (.+?)\r"),
            default: None,
        },
    ],
    licenses: LicenseSource::None,
    cards: None,
    interfaces: false,
    scrape: Some(ScrapeSource::Telnet(&LEITCH_RPARM)),
    config: ConfigCapture::TelnetTrimmed(&LEITCH_CROSSPOINTS),
};

/// DEV Systemtechnik RF switch: one status page, two fields.
pub static DEV: DriverProfile = DriverProfile {
    fields: &[
        InfoField {
            name: "productname",
            source: FieldSource::ScrapeRegex(r"Model[^:<]*:\s*([^<\r\n]+)"),
            default: None,
        },
        InfoField {
            name: "swversion",
            source: FieldSource::ScrapeRegex(r"Firmware[^:<]*:\s*([^<\r\n]+)"),
            default: None,
        },
    ],
    licenses: LicenseSource::None,
    cards: None,
    interfaces: false,
    scrape: Some(ScrapeSource::HttpGet { uri: "/showdata.htm" }),
    config: ConfigCapture::None,
};

/// A live host nothing recognized: record the address and whatever the
/// generic MIB-II identity objects will admit to.
pub static UNKNOWN: DriverProfile = DriverProfile {
    fields: &[
        InfoField {
            name: "productname",
            source: FieldSource::SnmpGet("1.3.6.1.2.1.1.1.0"),
            default: Some("UNKNOWN"),
        },
        InfoField {
            name: "unitname",
            source: FieldSource::SnmpGet("1.3.6.1.2.1.1.5.0"),
            default: Some("UNKNOWN"),
        },
    ],
    licenses: LicenseSource::None,
    cards: None,
    interfaces: false,
    scrape: None,
    config: ConfigCapture::None,
};
